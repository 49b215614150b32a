//! HTTP Request Handlers
//!
//! Shared handler state, the success envelope and service-level endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    models::requests::HealthCheckResponse,
    service::{AuthService, ItemService, JwtService, UserService},
    store::{ItemStore, UserStore},
    utils::error::{AppError, AppResult},
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub item_service: Arc<ItemService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wires every service over the given stores
    pub fn new(
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        jwt_service: Arc<JwtService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::with_bcrypt_cost(
                users.clone(),
                jwt_service.clone(),
                bcrypt_cost,
            )),
            user_service: Arc::new(UserService::with_bcrypt_cost(users, bcrypt_cost)),
            item_service: Arc::new(ItemService::new(items)),
            jwt_service,
        }
    }
}

/// Standard success response wrapper
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse<HealthCheckResponse>>> {
    // Check store connectivity
    state.user_service.health_check().await?;

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    };

    Ok(Json(SuccessResponse::new(response)))
}

/// Fallback for unknown routes so they share the JSON error body
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_creation() {
        let data = "test data";
        let response = SuccessResponse::new(data);
        assert!(response.success);
        assert_eq!(response.data, "test data");
    }

    #[test]
    fn test_success_response_shape() {
        let json = serde_json::to_value(SuccessResponse::new(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][1], 2);
    }
}
