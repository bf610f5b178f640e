//! HTTP handlers and route configuration.

mod auth;
mod health;
mod stats;
mod users;

use actix_web::web;

use atrium_core::domain::{User, UserRole};
use atrium_shared::dto::UserResponse;

use crate::middleware::auth::BearerToken;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/refresh", web::post().to(auth::refresh))
                    .route("/me", web::get().to(auth::me))
                    .route("/logout", web::post().to(auth::logout)),
            )
            // User CRUD routes
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create))
                    .route("", web::get().to(users::list))
                    .route("/{id}", web::get().to(users::get))
                    .route("/{id}", web::put().to(users::update))
                    .route("/{id}", web::delete().to(users::delete)),
            )
            // Stats (admin only)
            .route("/stats", web::get().to(stats::get_stats)),
    );
}

/// Map a domain user to its public representation.
pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        birth_date: user.birth_date,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Resolve the user behind the request's bearer token, or 401.
pub(crate) async fn current_user(state: &AppState, bearer: &BearerToken) -> AppResult<User> {
    state
        .auth
        .get_user_from_token(bearer.token())
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Parse a role string from a request body.
pub(crate) fn parse_role(value: &str) -> Result<UserRole, AppError> {
    match value {
        "admin" => Ok(UserRole::Admin),
        "user" => Ok(UserRole::User),
        other => Err(AppError::BadRequest(format!("Unknown role '{other}'"))),
    }
}
