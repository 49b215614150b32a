//! Utilities Module
//!
//! Shared utilities for error handling, security and validation used
//! throughout the API.

pub mod error;
pub mod security;
pub mod validation;

// Re-export commonly used utilities
pub use error::{AppError, AppResult, ErrorResponse};
pub use security::*;
pub use validation::*;
