use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::RepoError;

/// Persistence port for user storage.
///
/// Contract: `find_*` return `Ok(None)` (never an error) when no match
/// exists; [`update`](UserRepository::update) fails with
/// [`RepoError::NotFound`] for an unknown id; [`delete`](UserRepository::delete)
/// reports "nothing removed" as `Ok(false)`. A violated unique-email
/// constraint surfaces as [`RepoError::Constraint`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it as stored.
    async fn save(&self, user: User) -> Result<User, RepoError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Page through users. Ordering is unspecified; callers needing
    /// recency use [`StatsRepository`](crate::ports::StatsRepository).
    async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<User>, RepoError>;

    /// Overwrite an existing user's full field set.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    /// Hard-delete by id. Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}
