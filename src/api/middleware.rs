//! Authentication Middleware
//!
//! Bearer token authentication and role authorization for protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::models::{Role, UserContext};
use crate::service::{JwtService, TokenError};
use crate::utils::error::AppError;

/// Extension type for storing authenticated user context in request extensions
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserContext);

/// Rejections produced by the authentication gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthGateError {
    /// No `Authorization` header on a protected route
    #[error("Missing Authorization header")]
    MissingToken,

    /// Header is not `Bearer <token>`, or the token failed validation
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Caller's role does not satisfy the route's requirement
    #[error("Insufficient permissions")]
    Forbidden,
}

impl From<AuthGateError> for AppError {
    fn from(err: AuthGateError) -> Self {
        match err {
            AuthGateError::MissingToken | AuthGateError::InvalidToken => {
                AppError::Authentication(err.to_string())
            }
            AuthGateError::Forbidden => AppError::Forbidden(err.to_string()),
        }
    }
}

/// Validates the `Authorization` header against the token service
///
/// Shared by the required and optional middlewares.
pub fn authenticate(
    headers: &HeaderMap,
    jwt_service: &JwtService,
) -> Result<UserContext, AuthGateError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthGateError::MissingToken)?
        .to_str()
        .map_err(|_| AuthGateError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthGateError::InvalidToken)?;

    jwt_service.validate_token(token).map_err(|e| {
        match e {
            TokenError::Expired => log::debug!("Rejected expired token"),
            other => log::debug!("Rejected token: {}", other),
        }
        AuthGateError::InvalidToken
    })
}

/// Authentication middleware that validates JWT tokens and extracts user context
///
/// On success an [`AuthUser`] is inserted into the request extensions. A
/// missing, malformed, tampered or expired token yields 401.
pub async fn auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_context = authenticate(&headers, &jwt_service)?;
    request.extensions_mut().insert(AuthUser(user_context));

    Ok(next.run(request).await)
}

/// Optional authentication middleware that attaches user context when a valid
/// token is present but never rejects the request
pub async fn optional_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(user_context) = authenticate(&headers, &jwt_service) {
        request.extensions_mut().insert(AuthUser(user_context));
    }

    next.run(request).await
}

/// Role gate; must be layered inside [`auth_middleware`]
///
/// ```rust,ignore
/// get(list_users)
///     .route_layer(from_fn_with_state(Role::Admin, require_role))
///     .route_layer(from_fn_with_state(jwt_service, auth_middleware))
/// ```
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = extract_auth_user(&request)?;

    if !user.role.satisfies(required) {
        log::warn!(
            "User {} with role {} denied access to {} route",
            user.user_id,
            user.role,
            required
        );
        return Err(AuthGateError::Forbidden.into());
    }

    Ok(next.run(request).await)
}

/// Helper function to extract authenticated user from request extensions
///
/// The auth_middleware must be applied to the route for this to work.
pub fn extract_auth_user(request: &Request) -> Result<&UserContext, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .map(|auth_user| &auth_user.0)
        .ok_or_else(|| AuthGateError::MissingToken.into())
}

/// Helper function to optionally extract authenticated user from request extensions
pub fn extract_optional_auth_user(request: &Request) -> Option<&UserContext> {
    request
        .extensions()
        .get::<AuthUser>()
        .map(|auth_user| &auth_user.0)
}
