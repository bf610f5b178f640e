//! User CRUD handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use atrium_core::domain::UserChanges;
use atrium_shared::dto::{CreateUserRequest, UpdateUserRequest, UserListResponse};

use crate::handlers::{current_user, parse_role, user_response};
use crate::middleware::auth::BearerToken;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

/// POST /api/users - legacy unauthenticated create
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let user = state.users.create_user(req.name, req.email).await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// GET /api/users?skip=0&limit=100
pub async fn list(
    state: web::Data<AppState>,
    bearer: BearerToken,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    current_user(&state, &bearer).await?;

    let limit = query.limit.unwrap_or(100);
    let users = state.users.list_users(query.skip, limit).await?;
    let total = state.stats.count_users().await?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        users: users.iter().map(user_response).collect(),
        total,
    }))
}

/// GET /api/users/{id}
pub async fn get(
    state: web::Data<AppState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    current_user(&state, &bearer).await?;

    let user = state.users.get_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// PUT /api/users/{id}
pub async fn update(
    state: web::Data<AppState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    current_user(&state, &bearer).await?;

    let req = body.into_inner();

    if let Some(email) = req.email.as_deref() {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
    }
    if let Some(name) = req.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }
    }

    let role = req.role.as_deref().map(parse_role).transpose()?;

    let user = state
        .users
        .update_user(
            path.into_inner(),
            UserChanges {
                name: req.name,
                email: req.email,
                birth_date: req.birth_date,
                role,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

/// DELETE /api/users/{id}
pub async fn delete(
    state: web::Data<AppState>,
    bearer: BearerToken,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    current_user(&state, &bearer).await?;

    state.users.delete_user(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
