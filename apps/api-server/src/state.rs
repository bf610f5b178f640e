//! Application state - shared across all handlers.

use std::sync::Arc;

use atrium_core::ports::{PasswordService, StatsRepository, TokenService, UserRepository};
use atrium_core::service::{AuthService, UserService};
use atrium_infra::auth::{Argon2PasswordService, JwtTokenService};
use atrium_infra::database::{DatabaseConfig, InMemoryUserRepository, PostgresUserRepository, connect};

/// Shared application state. Handlers talk to the services; no adapter
/// type leaks past this module.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub stats: Arc<dyn StatsRepository>,
}

impl AppState {
    /// Wire adapters and services: Postgres when configured and
    /// reachable, the in-memory store otherwise.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let (repo, stats) = match db_config {
            Some(config) => match connect(config).await {
                Ok(conn) => {
                    let adapter = Arc::new(PostgresUserRepository::new(conn));
                    let repo: Arc<dyn UserRepository> = adapter.clone();
                    let stats: Arc<dyn StatsRepository> = adapter;
                    (repo, stats)
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "database connection failed; falling back to the in-memory store"
                    );
                    in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set; user data will not survive restarts");
                in_memory()
            }
        };

        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());

        tracing::info!("application state initialized");

        Self {
            auth: Arc::new(AuthService::new(repo.clone(), passwords, tokens)),
            users: Arc::new(UserService::new(repo)),
            stats,
        }
    }
}

fn in_memory() -> (Arc<dyn UserRepository>, Arc<dyn StatsRepository>) {
    let adapter = Arc::new(InMemoryUserRepository::new());
    let repo: Arc<dyn UserRepository> = adapter.clone();
    let stats: Arc<dyn StatsRepository> = adapter;
    (repo, stats)
}
