//! Web Application API Library
//!
//! Backend for a three-tier web application: account registration and login
//! with stateless bearer tokens, role-based user management, and an item
//! catalogue with paging, sorting and search.
//!
//! # Features
//!
//! - **Token Authentication**: HS256 JWTs carrying the user id and role
//! - **Password Security**: bcrypt hashing with configurable cost factors
//! - **Role-Based Access**: owner-or-admin rules for users and items
//! - **Pluggable Storage**: PostgreSQL through SQLx, or an in-memory store
//! - **Flexible Router**: Configurable endpoints via RouterBuilder pattern
//! - **Typed Client**: reqwest client for the HTTP API
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use webapp_api::{
//!     api::{AppState, RouterBuilder},
//!     service::JwtService,
//!     store::MemoryStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let jwt_service = Arc::new(JwtService::new(
//!         "a-signing-secret-of-at-least-32-bytes",
//!         "webapp-api",
//!     ));
//!
//!     let state = AppState::new(store.clone(), store, jwt_service, 10);
//!
//!     // Only expose the public catalogue
//!     let app = RouterBuilder::with_readonly_routes().build(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: HTTP handlers, auth middleware and configurable routes
//! - **Service Layer**: Business rules, validation and authorization
//! - **Store**: Record persistence behind the `UserStore`/`ItemStore` traits
//! - **Models**: Data structures and request/response payloads
//! - **Client**: HTTP client for the API

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// HTTP client for the API
pub mod client;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and configuration
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Authentication, user and item services
pub mod service;

/// Record stores
pub mod store;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use client::{ApiClient, ClientError};
pub use models::{
    auth::{IssuedToken, LoginResponse, UserContext},
    item::Item,
    requests::{
        CreateItemRequest, ItemListResponse, ListItemsParams, LoginRequest, RegisterRequest,
        UpdateItemRequest, UpdateUserRequest,
    },
    user::{Role, User},
};
pub use service::{AuthService, ItemService, JwtService, UserService};
pub use store::{ItemStore, MemoryStore, PgStore, UserStore};
pub use utils::error::{AppError, AppResult, ErrorResponse};

// Re-export database utilities for configuration
pub use database::{DatabaseConfig, DatabasePool, StorageBackend};

// Re-export configuration system
pub use config::{env, AppConfig, JwtConfig, SecurityConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
