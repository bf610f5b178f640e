//! PostgreSQL implementation of the persistence and stats ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use atrium_core::domain::{User, mask_email};
use atrium_core::error::RepoError;
use atrium_core::ports::{StatsRepository, UserRepository};

use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository over a pooled SeaORM connection.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Classify a write error: a violated unique index becomes
/// [`RepoError::Constraint`] so services can surface a domain conflict
/// instead of a raw storage error.
fn map_write_err(e: DbErr) -> RepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => RepoError::Query(e.to_string()),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: User) -> Result<User, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let active: user::ActiveModel = user.into();
        let model = active.insert(&txn).await.map_err(map_write_err)?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        // Overwrite semantics: the row must exist first. Dropping the
        // transaction on the error path rolls it back.
        let existing = UserEntity::find_by_id(user.id)
            .one(&txn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        if existing.is_none() {
            return Err(RepoError::NotFound);
        }

        let active: user::ActiveModel = user.into();
        let model = active.update(&txn).await.map_err(map_write_err)?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let result = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl StatsRepository for PostgresUserRepository {
    async fn count_users(&self) -> Result<u64, RepoError> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn count_registered_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError> {
        UserEntity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn count_registered_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        UserEntity::find()
            .filter(user::Column::CreatedAt.gte(start))
            .filter(user::Column::CreatedAt.lt(end))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn recent_users(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
