//! User Management Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::handlers::{AppState, SuccessResponse};
use super::middleware::AuthUser;
use crate::models::{UpdateUserRequest, User};
use crate::utils::error::AppResult;

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse<Vec<User>>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(SuccessResponse::new(users)))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse<User>>> {
    let user = state.user_service.get_user(&actor, user_id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Update user profile
pub async fn update_user(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<SuccessResponse<User>>> {
    let user = state
        .user_service
        .update_user(&actor, user_id, request)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// Delete a user and the items they own
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(&actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
