//! API Layer
//!
//! HTTP API endpoints and request handling.

pub mod auth_handlers;
pub mod handlers;
pub mod item_handlers;
pub mod middleware;
pub mod routes;
pub mod security_middleware;
pub mod user_handlers;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use handlers::{AppState, SuccessResponse};
pub use middleware::{
    auth_middleware, authenticate, extract_auth_user, extract_optional_auth_user,
    optional_auth_middleware, require_role, AuthGateError, AuthUser,
};
pub use routes::{create_routes, RouterBuilder};
pub use security_middleware::security_headers_middleware;
