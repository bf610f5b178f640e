//! Bearer-token extraction.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};

use crate::middleware::error::AppError;

/// Raw bearer token pulled from the Authorization header.
///
/// Handlers resolve it to a user through
/// `AuthService::get_user_from_token`, so authorization decisions always
/// see the current database state rather than token-embedded claims.
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)
            .and_then(|value| value.to_str().map_err(|_| AppError::Unauthorized))
            .and_then(|value| value.strip_prefix("Bearer ").ok_or(AppError::Unauthorized))
            .map(|token| BearerToken(token.to_string()));

        ready(result)
    }
}
