//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// A closed set: callers branch on the variant, never on the message text.
/// The HTTP layer owns the mapping to status codes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user with email '{0}' already exists")]
    AlreadyExists(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] RepoError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Repository-level errors surfaced through the persistence port.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}
