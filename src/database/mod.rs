//! Database Module
//!
//! Database connection management and utilities for the API.

pub mod connection;

// Re-export commonly used types
pub use connection::{run_migrations, DatabaseConfig, DatabasePool, Pagination, StorageBackend};
