//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::item::Item;
use crate::models::user::Role;
use crate::utils::validation::{
    email_validator, name_validator, title_validator, validate_password_strength,
};

/// Request payload for registering a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User's display name (1-100 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// User's email address (must be unique and valid format)
    #[validate(
        length(max = 320, message = "Email must be at most 320 characters"),
        custom(function = "email_validator")
    )]
    pub email: String,

    /// User's password (8-128 characters, letters and digits)
    #[validate(
        length(
            min = 8,
            max = 128,
            message = "Password must be between 8 and 128 characters"
        ),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

/// Request payload for logging in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Request payload for updating a user; omitted fields are preserved
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "name_validator"))]
    pub name: Option<String>,

    /// Must stay unique if changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 320, message = "Email must be at most 320 characters"),
        custom(function = "email_validator")
    )]
    pub email: Option<String>,

    /// New password; re-hashed before storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(
            min = 8,
            max = 128,
            message = "Password must be between 8 and 128 characters"
        ),
        custom(function = "validate_password_strength")
    )]
    pub password: Option<String>,

    /// Admin only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Request payload for creating an item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "title_validator")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: f64,
}

/// Request payload for updating an item; omitted fields are preserved
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "title_validator")
    )]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: Option<f64>,
}

/// Query string accepted by `GET /api/items`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListItemsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListItemsParams {
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Field name, `-` prefixed for descending
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Response for item listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// Response for health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            password: "SecurePass123".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_fields() {
        let mut request = register_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());

        let mut request = register_request();
        request.password = "short1".to_string();
        assert!(request.validate().is_err());

        let mut request = register_request();
        request.password = "nodigitsatall".to_string();
        assert!(request.validate().is_err());

        let mut request = register_request();
        request.name = "".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_email_longer_than_column_rejected() {
        let long_email = format!("{}@example.com", "a".repeat(310));

        let mut request = register_request();
        request.email = long_email.clone();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let update = UpdateUserRequest {
            email: Some(long_email),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_fields() {
        let request = LoginRequest {
            email: "".to_string(),
            password: "".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_update_user_request_optional_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let request = UpdateUserRequest {
            email: Some("bad".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_user_request_parses_role() {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert_eq!(request.role, Some(Role::Admin));
        assert!(request.name.is_none());
    }

    #[test]
    fn test_create_item_request_validation() {
        let valid = CreateItemRequest {
            title: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: 29.99,
        };
        assert!(valid.validate().is_ok());

        let negative = CreateItemRequest {
            price: -1.0,
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        let blank = CreateItemRequest {
            title: "   ".to_string(),
            ..valid.clone()
        };
        assert!(blank.validate().is_err());

        let long = CreateItemRequest {
            description: "x".repeat(2001),
            ..valid
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_create_item_description_defaults_to_empty() {
        let request: CreateItemRequest =
            serde_json::from_str(r#"{"title":"Pen","price":1.5}"#).unwrap();
        assert_eq!(request.description, "");
    }
}
