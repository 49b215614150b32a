//! Authentication Models
//!
//! Token claims and the per-request identity extracted from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Role, User};

/// JWT claims structure for access tokens
///
/// Standard registered claims plus the caller's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject - user ID
    pub sub: String,

    /// Role at the time of issuance
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID - unique token identifier
    pub jti: String,

    /// Issuer
    pub iss: String,
}

impl AccessTokenClaims {
    /// Create new access token claims
    pub fn new(
        user_id: Uuid,
        role: Role,
        issuer: &str,
        expires_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: issuer.to_string(),
        }
    }
}

/// User context extracted from a validated token
///
/// Inserted into request extensions by the auth middleware and consulted by
/// services for authorization decisions.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// User ID extracted from token subject
    pub user_id: Uuid,

    /// Role embedded in the token
    pub role: Role,

    /// Token ID
    pub token_id: String,

    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

impl UserContext {
    /// Create user context from access token claims
    pub fn from_access_claims(claims: &AccessTokenClaims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            role: claims.role,
            token_id: claims.jti.clone(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule shared by user and item mutations
    pub fn can_act_on(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

/// Signed bearer token handed to the client after login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Lifetime in seconds
    pub expires_in: i64,
}

impl IssuedToken {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Response body for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: User,
}
