//! In-memory port implementations for service tests.
//!
//! The crypto-backed adapters live in the infrastructure crate; these
//! doubles only reproduce the port contracts.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::RepoError;
use crate::ports::{AuthError, PasswordService, TokenKind, TokenService, UserRepository};

/// In-memory store enforcing the unique-email constraint.
#[derive(Default)]
pub struct MemoryUsers {
    users: RwLock<HashMap<Uuid, User>>,
    /// When set, `find_by_email` pretends to see nothing, simulating a
    /// concurrent writer racing the check-then-insert sequence.
    pub hide_from_lookup: AtomicBool,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint(format!(
                "duplicate email {}",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        if self.hide_from_lookup.load(std::sync::atomic::Ordering::Relaxed) {
            return Ok(None);
        }
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| (u.created_at, u.id));
        Ok(all
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate email {}",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.users.write().unwrap().remove(&id).is_some())
    }
}

/// Transparent stand-in hasher.
pub struct PlainHasher;

impl PasswordService for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Transparent token encoding: `<kind>:<uuid>`.
pub struct StaticTokens;

impl TokenService for StaticTokens {
    fn create_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        Ok(format!("access:{user_id}"))
    }

    fn create_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        Ok(format!("refresh:{user_id}"))
    }

    fn verify_token(&self, token: &str, expected: TokenKind) -> Option<Uuid> {
        let (kind, id) = token.split_once(':')?;
        if kind != expected.as_str() {
            return None;
        }
        Uuid::parse_str(id).ok()
    }
}
