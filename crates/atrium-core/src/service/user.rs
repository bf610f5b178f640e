//! User service: CRUD orchestration over the persistence port.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, UserChanges};
use crate::error::{DomainError, RepoError};
use crate::ports::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Legacy creation path, kept for the unauthenticated create route.
    /// The record carries no credentials; prefer
    /// [`AuthService::register_user`](crate::service::AuthService::register_user).
    pub async fn create_user(&self, name: String, email: String) -> Result<User, DomainError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::AlreadyExists(email));
        }

        match self.users.save(User::new(name, email.clone())).await {
            Ok(saved) => Ok(saved),
            Err(RepoError::Constraint(_)) => Err(DomainError::AlreadyExists(email)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::NotFound(email.to_string()))
    }

    pub async fn list_users(&self, skip: u64, limit: u64) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all(skip, limit).await?)
    }

    /// Apply a changeset to an existing user. The email-uniqueness
    /// re-check runs only when the email is actually changing, and any
    /// conflict is reported before a single field is mutated.
    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;

        if let Some(new_email) = changes.email.as_deref() {
            if new_email != user.email && self.users.find_by_email(new_email).await?.is_some() {
                return Err(DomainError::AlreadyExists(new_email.to_string()));
            }
        }

        user.apply(changes);
        let email = user.email.clone();

        match self.users.update(user).await {
            Ok(updated) => Ok(updated),
            Err(RepoError::NotFound) => Err(DomainError::NotFound(id.to_string())),
            // Lost the check-then-act race; the unique index caught it.
            Err(RepoError::Constraint(_)) => Err(DomainError::AlreadyExists(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Hard delete. Fails with [`DomainError::NotFound`] for an unknown
    /// id, including the case where a concurrent delete won the race.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(DomainError::NotFound(id.to_string()));
        }

        if !self.users.delete(id).await? {
            return Err(DomainError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::MemoryUsers;

    fn service() -> (Arc<MemoryUsers>, UserService) {
        let users = Arc::new(MemoryUsers::new());
        (users.clone(), UserService::new(users))
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let (_, svc) = service();

        let created = svc
            .create_user("Ana".into(), "ana@x.com".into())
            .await
            .unwrap();
        let fetched = svc.get_user(created.id).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.email, "ana@x.com");
        assert!(fetched.password_hash.is_empty());
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let (_, svc) = service();

        let err = svc.get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = svc.get_user_by_email("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_users_paginates() {
        let (_, svc) = service();
        for i in 0..5 {
            svc.create_user(format!("User {i}"), format!("user{i}@x.com"))
                .await
                .unwrap();
        }

        let page = svc.list_users(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);

        let tail = svc.list_users(4, 10).await.unwrap();
        assert_eq!(tail.len(), 1);
    }

    #[tokio::test]
    async fn update_name_only_keeps_email_and_stamps_updated_at() {
        let (_, svc) = service();
        let created = svc
            .create_user("Ana".into(), "ana@x.com".into())
            .await
            .unwrap();
        assert!(created.updated_at.is_none());

        let updated = svc
            .update_user(
                created.id,
                UserChanges {
                    name: Some("Ana Maria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana@x.com");
        let updated_at = updated.updated_at.expect("updated_at stamped");
        assert!(updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn update_to_taken_email_conflicts_before_mutation() {
        let (_, svc) = service();
        svc.create_user("Ana".into(), "ana@x.com".into())
            .await
            .unwrap();
        let bob = svc
            .create_user("Bob".into(), "bob@x.com".into())
            .await
            .unwrap();

        let err = svc
            .update_user(
                bob.id,
                UserChanges {
                    email: Some("ana@x.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        // Nothing was applied.
        let unchanged = svc.get_user(bob.id).await.unwrap();
        assert_eq!(unchanged.email, "bob@x.com");
        assert!(unchanged.updated_at.is_none());
    }

    #[tokio::test]
    async fn update_to_own_email_skips_uniqueness_check() {
        let (_, svc) = service();
        let ana = svc
            .create_user("Ana".into(), "ana@x.com".into())
            .await
            .unwrap();

        let updated = svc
            .update_user(
                ana.id,
                UserChanges {
                    email: Some("ana@x.com".into()),
                    name: Some("Ana Maria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "ana@x.com");
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let (_, svc) = service();

        let err = svc
            .update_user(Uuid::new_v4(), UserChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (_, svc) = service();
        let created = svc
            .create_user("Ana".into(), "ana@x.com".into())
            .await
            .unwrap();

        svc.delete_user(created.id).await.unwrap();

        let err = svc.get_user(created.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let (_, svc) = service();

        let err = svc.delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
