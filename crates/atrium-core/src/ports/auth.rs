//! Authentication ports: password hashing and token issuance.

use uuid::Uuid;

/// Token type discriminator embedded in every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Password hashing service. Implementations must use a slow, salted,
/// one-way hash; the plaintext never leaves the call.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash. `Ok(false)` for a
    /// well-formed hash that does not match.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Symmetric-key token issuance and verification.
pub trait TokenService: Send + Sync {
    fn create_access_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    fn create_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Returns the subject id only when the signature verifies, the
    /// token is unexpired and the type tag matches `expected`.
    /// Malformed, expired and mistyped tokens are recoverable
    /// conditions, reported as `None` rather than errors.
    fn verify_token(&self, token: &str, expected: TokenKind) -> Option<Uuid>;
}

/// Failures from the hashing/signing backends.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token encoding failed: {0}")]
    TokenEncoding(String),
}
