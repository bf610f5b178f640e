//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::ports::{AuthError, TokenKind, TokenService};

/// JWT signing configuration. The secret and algorithm come from the
/// environment; both token lifetimes are configuration inputs, not
/// business constants.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    #[serde(rename = "type")]
    kind: String, // "access" | "refresh"
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
}

/// JWT-based token service signing with a symmetric key.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Build from `JWT_SECRET`, `JWT_ALGORITHM`,
    /// `ACCESS_TOKEN_EXPIRE_MINUTES` and `REFRESH_TOKEN_EXPIRE_DAYS`.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-production".to_string());
        if secret == "change-me-in-production" {
            tracing::warn!("using placeholder JWT secret; set JWT_SECRET before deploying");
        }

        let algorithm = std::env::var("JWT_ALGORITHM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Algorithm::HS256);

        let config = JwtConfig {
            secret,
            algorithm,
            access_ttl_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            refresh_ttl_days: std::env::var("REFRESH_TOKEN_EXPIRE_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
        };

        Self::new(config)
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind, ttl: TimeDelta) -> Result<String, AuthError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user_id.to_string(),
            kind: kind.as_str().to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AuthError::TokenEncoding(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn create_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.issue(
            user_id,
            TokenKind::Access,
            TimeDelta::minutes(self.config.access_ttl_minutes),
        )
    }

    fn create_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.issue(
            user_id,
            TokenKind::Refresh,
            TimeDelta::days(self.config.refresh_ttl_days),
        )
    }

    fn verify_token(&self, token: &str, expected: TokenKind) -> Option<Uuid> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;

        // Expired, malformed and mistyped tokens are expected
        // conditions here, reported as absence rather than errors.
        let data = decode::<Claims>(token, &self.decoding_key, &validation).ok()?;
        if data.claims.kind != expected.as_str() {
            return None;
        }

        Uuid::parse_str(&data.claims.sub).ok()
    }
}
