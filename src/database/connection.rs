//! Database Connection Management
//!
//! Utilities for managing PostgreSQL connections with SQLx.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{env, ConfigError};
use crate::models::item::MAX_PAGE_SIZE;

/// Database connection pool type alias for convenience
pub type DatabasePool = PgPool;

/// Which record store the server runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// PostgreSQL through SQLx
    #[default]
    Postgres,
    /// Process-local maps; data is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND".to_string(),
                value: other.to_string(),
                reason: "expected 'postgres' or 'memory'".to_string(),
            }),
        }
    }
}

/// Database configuration for connection setup
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Required for the Postgres backend
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            url: None,
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

impl DatabaseConfig {
    /// Create database configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = env::get_string("STORAGE_BACKEND", "postgres").parse()?;

        let url = std::env::var("DATABASE_URL").ok();
        if backend == StorageBackend::Postgres && url.is_none() {
            return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
        }

        Ok(Self {
            backend,
            url,
            max_connections: env::get_u32("DB_MAX_CONNECTIONS", 20),
            min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
            connect_timeout: Duration::from_secs(env::get_u64("DB_CONNECT_TIMEOUT", 30)),
            idle_timeout: Duration::from_secs(env::get_u64("DB_IDLE_TIMEOUT", 600)),
            max_lifetime: Duration::from_secs(env::get_u64("DB_MAX_LIFETIME", 3600)),
        })
    }

    /// Create a database connection pool from this configuration
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(url)
            .await
    }
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Simple pagination helper for database queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE) as i64;
        let page = page.max(1) as i64;
        let offset = (page - 1) * per_page;

        Self {
            limit: per_page,
            offset,
        }
    }

    /// Number of pages needed to show `total` rows
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }
}
