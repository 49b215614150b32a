//! Security Configuration
//!
//! Password hashing cost and response hardening settings.

use super::{env, ConfigError};
use crate::utils::security::DEFAULT_BCRYPT_COST;

/// Password and response security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// bcrypt cost factor (4..=31)
    pub bcrypt_cost: u32,

    /// Whether to attach the standard security headers to every response
    pub security_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            security_headers: true,
        }
    }
}

impl SecurityConfig {
    pub fn from_env() -> Self {
        Self {
            bcrypt_cost: env::get_u32("BCRYPT_COST", DEFAULT_BCRYPT_COST),
            security_headers: env::get_bool("SECURITY_HEADERS", true),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST".to_string(),
                value: self.bcrypt_cost.to_string(),
                reason: "must be between 4 and 31".to_string(),
            });
        }

        Ok(())
    }
}
