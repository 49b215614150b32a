//! Data Models Module
//!
//! Data structures used throughout the API: users and roles, items, token
//! claims, and request/response payloads.

pub mod auth;
pub mod item;
pub mod requests;
pub mod user;

// Re-export commonly used types
pub use auth::*;
pub use item::*;
pub use requests::*;
pub use user::*;
