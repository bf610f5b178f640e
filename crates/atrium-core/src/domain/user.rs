use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Parse a stored role string. Unknown values collapse to `User`.
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// Optional-field changeset applied through [`User::apply`].
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<UserRole>,
}

/// User entity - the aggregate root of this system.
///
/// `id` and `created_at` are assigned at construction and never change;
/// all other mutation goes through [`User::apply`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Hashed secret. Empty only for records created through the legacy
    /// path that bypasses authentication; such accounts cannot log in.
    pub password_hash: String,
    pub role: UserRole,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a user through the registration path.
    pub fn register(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            birth_date,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Legacy creation path: no credentials attached.
    pub fn new(name: String, email: String) -> Self {
        Self::register(name, email, String::new(), UserRole::default(), None)
    }

    /// Apply a changeset. Fields left `None` keep their current value;
    /// `updated_at` is stamped on every call. This is the only mutation
    /// path for a stored user.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(birth_date) = changes.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        self.updated_at = Some(Utc::now());
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Mask an email address before it reaches a log line.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at) => {
            let (local, domain) = email.split_at(at);
            if local.len() > 1 {
                format!("{}***{}", &local[..1], domain)
            } else {
                format!("***{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_id_and_created_at() {
        let user = User::register(
            "Ana".into(),
            "ana@x.com".into(),
            "$argon2id$...".into(),
            UserRole::User,
            None,
        );

        assert!(!user.id.is_nil());
        assert!(user.updated_at.is_none());
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn legacy_path_has_empty_hash_and_default_role() {
        let user = User::new("Bob".into(), "bob@x.com".into());

        assert!(user.password_hash.is_empty());
        assert_eq!(user.role, UserRole::User);
        assert!(user.birth_date.is_none());
    }

    #[test]
    fn apply_overwrites_only_provided_fields() {
        let mut user = User::new("Bob".into(), "bob@x.com".into());
        let id = user.id;

        user.apply(UserChanges {
            name: Some("Robert".into()),
            ..Default::default()
        });

        assert_eq!(user.name, "Robert");
        assert_eq!(user.email, "bob@x.com");
        assert_eq!(user.id, id);
    }

    #[test]
    fn apply_stamps_updated_at_after_created_at() {
        let mut user = User::new("Bob".into(), "bob@x.com".into());
        assert!(user.updated_at.is_none());

        user.apply(UserChanges::default());

        let updated_at = user.updated_at.expect("updated_at stamped");
        assert!(updated_at >= user.created_at);
    }

    #[test]
    fn role_round_trips_through_storage_strings() {
        assert_eq!(UserRole::parse(UserRole::Admin.as_str()), UserRole::Admin);
        assert_eq!(UserRole::parse(UserRole::User.as_str()), UserRole::User);
        assert_eq!(UserRole::parse("something-else"), UserRole::User);
    }

    #[test]
    fn mask_email_hides_local_part() {
        assert_eq!(mask_email("ana@x.com"), "a***@x.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
