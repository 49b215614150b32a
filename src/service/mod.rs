//! Service Layer
//!
//! Business logic between the HTTP handlers and the record stores.

pub mod auth;
pub mod item;
pub mod jwt;
pub mod user;

// Re-export services
pub use auth::{AuthService, AuthServiceError};
pub use item::{ItemService, ItemServiceError};
pub use jwt::{JwtService, TokenError};
pub use user::{UserService, UserServiceError};
