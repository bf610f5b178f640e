//! # Atrium Infrastructure
//!
//! Concrete implementations of the ports defined in `atrium-core`:
//! SeaORM/PostgreSQL persistence, an in-memory store, Argon2 password
//! hashing and JWT token issuance.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports
pub use database::InMemoryUserRepository;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresUserRepository, connect};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
