//! Authentication handlers.

use actix_web::{HttpResponse, web};

use atrium_core::domain::UserRole;
use atrium_core::service::Registration;
use atrium_shared::dto::{
    LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterUserRequest, TokenResponse,
};

use crate::handlers::{current_user, parse_role, user_response};
use crate::middleware::auth::BearerToken;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let role = match req.role.as_deref() {
        Some(value) => parse_role(value)?,
        None => UserRole::default(),
    };

    let user = state
        .auth
        .register_user(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            role,
            birth_date: req.birth_date,
        })
        .await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.auth.authenticate(&req.email, &req.password).await?;

    let access_token = state.auth.create_access_token(user.id)?;
    let refresh_token = state.auth.create_refresh_token(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
        user: user_response(&user),
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let (access_token, user) = state
        .auth
        .refresh_access_token(&body.refresh_token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(RefreshTokenResponse {
        access_token,
        user: user_response(&user),
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, bearer: BearerToken) -> AppResult<HttpResponse> {
    let user = current_user(&state, &bearer).await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// POST /api/auth/logout
///
/// Tokens are stateless and the server holds no session state; logout
/// is the client discarding its tokens.
pub async fn logout() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
