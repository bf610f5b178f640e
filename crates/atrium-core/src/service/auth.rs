//! Authentication service: registration, credential verification and
//! token issuance over the persistence port.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{User, UserRole, mask_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenKind, TokenService, UserRepository};

/// Input for [`AuthService::register_user`]. The plaintext password is
/// consumed by registration and discarded right after hashing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub birth_date: Option<NaiveDate>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new user. Fails with [`DomainError::AlreadyExists`]
    /// when the email is taken.
    pub async fn register_user(&self, registration: Registration) -> Result<User, DomainError> {
        let email = registration.email.clone();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::AlreadyExists(email));
        }

        let password_hash = self
            .passwords
            .hash(&registration.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::register(
            registration.name,
            registration.email,
            password_hash,
            registration.role,
            registration.birth_date,
        );

        match self.users.save(user).await {
            Ok(saved) => {
                tracing::info!(user_id = %saved.id, "user registered");
                Ok(saved)
            }
            // Two racing registrations can both pass the email check;
            // the unique index turns the loser into a constraint
            // violation, surfaced as the same domain conflict.
            Err(RepoError::Constraint(_)) => Err(DomainError::AlreadyExists(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials. The unknown-email and wrong-password branches
    /// are logged separately but collapse into one
    /// [`DomainError::InvalidCredentials`] toward the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!(email = %mask_email(email), "login rejected: unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        // Legacy records carry no credentials and can never log in.
        if user.password_hash.is_empty() {
            tracing::debug!(user_id = %user.id, "login rejected: account has no password");
            return Err(DomainError::InvalidCredentials);
        }

        let verified = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !verified {
            tracing::debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub fn create_access_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.tokens
            .create_access_token(user_id)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    pub fn create_refresh_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.tokens
            .create_refresh_token(user_id)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Resolve the user behind an access token. Absent at either step
    /// (bad token or deleted user) yields `Ok(None)`.
    pub async fn get_user_from_token(
        &self,
        access_token: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user_id) = self.tokens.verify_token(access_token, TokenKind::Access) else {
            return Ok(None);
        };
        Ok(self.users.find_by_id(user_id).await?)
    }

    /// Issue a fresh access token from a refresh token. Fails closed
    /// (`Ok(None)`) when the token does not verify or its subject was
    /// deleted after issuance. The refresh token itself is not rotated;
    /// it stays valid until natural expiry.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<(String, User)>, DomainError> {
        let Some(user_id) = self.tokens.verify_token(refresh_token, TokenKind::Refresh) else {
            return Ok(None);
        };
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let access_token = self.create_access_token(user.id)?;
        Ok(Some((access_token, user)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::service::testing::{MemoryUsers, PlainHasher, StaticTokens};

    fn service() -> (Arc<MemoryUsers>, AuthService) {
        let users = Arc::new(MemoryUsers::new());
        let auth = AuthService::new(users.clone(), Arc::new(PlainHasher), Arc::new(StaticTokens));
        (users, auth)
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            name: "Ana".into(),
            email: email.into(),
            password: password.into(),
            role: UserRole::User,
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate_returns_same_user() {
        let (_, auth) = service();

        let registered = auth
            .register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();
        assert_eq!(registered.role, UserRole::User);
        assert_ne!(registered.password_hash, "pw123");

        let authenticated = auth.authenticate("ana@x.com", "pw123").await.unwrap();
        assert_eq!(authenticated.id, registered.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let (_, auth) = service();
        auth.register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();

        let wrong_password = auth.authenticate("ana@x.com", "wrong").await.unwrap_err();
        let unknown_email = auth.authenticate("ghost@x.com", "pw123").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_leaves_store_unchanged() {
        let (users, auth) = service();
        auth.register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();

        let err = auth
            .register_user(registration("ana@x.com", "other"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn racing_registration_maps_constraint_to_already_exists() {
        let (users, auth) = service();
        auth.register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();

        // Simulate the second of two concurrent registrations: the
        // email check sees nothing, the unique constraint still fires.
        users.hide_from_lookup.store(true, Ordering::Relaxed);
        let err = auth
            .register_user(registration("ana@x.com", "other"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn legacy_account_without_password_cannot_authenticate() {
        let (users, auth) = service();
        users
            .save(User::new("Bob".into(), "bob@x.com".into()))
            .await
            .unwrap();

        let err = auth.authenticate("bob@x.com", "").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn access_token_resolves_to_user() {
        let (_, auth) = service();
        let user = auth
            .register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();

        let token = auth.create_access_token(user.id).unwrap();
        let resolved = auth.get_user_from_token(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_as_access_token() {
        let (_, auth) = service();
        let user = auth
            .register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();

        let refresh = auth.create_refresh_token(user.id).unwrap();
        assert!(auth.get_user_from_token(&refresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_fails_closed_after_user_deleted() {
        let (users, auth) = service();
        let user = auth
            .register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();
        let refresh = auth.create_refresh_token(user.id).unwrap();

        users.delete(user.id).await.unwrap();

        assert!(auth.refresh_access_token(&refresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_issues_new_access_token_without_rotation() {
        let (_, auth) = service();
        let user = auth
            .register_user(registration("ana@x.com", "pw123"))
            .await
            .unwrap();
        let refresh = auth.create_refresh_token(user.id).unwrap();

        let (access, refreshed) = auth
            .refresh_access_token(&refresh)
            .await
            .unwrap()
            .expect("refresh accepted");
        assert_eq!(refreshed.id, user.id);
        assert!(auth.get_user_from_token(&access).await.unwrap().is_some());

        // The same refresh token keeps working until natural expiry.
        assert!(auth.refresh_access_token(&refresh).await.unwrap().is_some());
    }
}
