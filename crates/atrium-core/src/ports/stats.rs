use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::User;
use crate::error::RepoError;

/// Read-only aggregation port backing the statistics endpoint.
///
/// Kept separate from [`UserRepository`](crate::ports::UserRepository)
/// so the persistence contract stays a plain six-operation CRUD surface.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn count_users(&self) -> Result<u64, RepoError>;

    /// Users created at or after `since`.
    async fn count_registered_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError>;

    /// Users created in the half-open interval `[start, end)`.
    async fn count_registered_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, RepoError>;

    /// Most recently created users, newest first.
    async fn recent_users(&self, limit: u64) -> Result<Vec<User>, RepoError>;
}
