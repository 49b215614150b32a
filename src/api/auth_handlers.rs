//! Authentication Handlers
//!
//! Registration, login and the caller's own profile.

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::handlers::{AppState, SuccessResponse};
use super::middleware::AuthUser;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::utils::error::AppResult;

/// Register a new account
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<SuccessResponse<User>>)> {
    let user = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(user))))
}

/// Exchange credentials for a bearer token
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SuccessResponse<LoginResponse>>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(SuccessResponse::new(response)))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
) -> AppResult<Json<SuccessResponse<User>>> {
    let user = state.auth_service.profile(&actor).await?;
    Ok(Json(SuccessResponse::new(user)))
}
