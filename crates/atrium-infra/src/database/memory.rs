//! In-memory persistence adapter - used for tests and when no database
//! is configured. Data is lost on process restart.
//!
//! Mirrors the contract of the PostgreSQL adapter, including the
//! unique-email constraint.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use atrium_core::domain::User;
use atrium_core::error::RepoError;
use atrium_core::ports::{StatsRepository, UserRepository};

/// In-memory user store using a HashMap behind an async RwLock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on email '{}'",
                user.email
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;

        // Stable page boundaries; the port leaves ordering unspecified.
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| (u.created_at, u.id));

        Ok(all
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on email '{}'",
                user.email
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl StatsRepository for InMemoryUserRepository {
    async fn count_users(&self) -> Result<u64, RepoError> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn count_registered_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.created_at >= since)
            .count() as u64)
    }

    async fn count_registered_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.created_at >= start && u.created_at < end)
            .count() as u64)
    }

    async fn recent_users(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;

        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit as usize);

        Ok(all)
    }
}
