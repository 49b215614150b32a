//! JWT Authentication Service
//!
//! Issues and validates the stateless bearer tokens that carry a caller's
//! identity and role. Nothing is persisted; a token is valid until it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AccessTokenClaims, IssuedToken, Role, UserContext};

/// Token issuance and validation errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    Generation(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT service for access token management
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Expected `iss` claim
    issuer: String,
    /// Access token lifetime (default: 1 hour)
    expires_in: Duration,
}

impl JwtService {
    /// Create a new JWT service with the default one hour lifetime
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self::with_expiration(secret, issuer, Duration::hours(1))
    }

    /// Create a new JWT service with a custom token lifetime
    pub fn with_expiration(secret: &str, issuer: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            expires_in,
        }
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Sign a bearer token for a user
    pub fn issue_token(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = AccessTokenClaims::new(user_id, role, &self.issuer, now + self.expires_in, now);
        let token = self.encode_claims(&claims)?;

        Ok(IssuedToken::bearer(token, self.expires_in.num_seconds()))
    }

    /// Validate a bearer token and extract the caller's context
    pub fn validate_token(&self, token: &str) -> Result<UserContext, TokenError> {
        let claims = self.decode_claims(token)?;
        UserContext::from_access_claims(&claims)
            .map_err(|_| TokenError::Invalid("Invalid user ID in token".into()))
    }

    fn encode_claims(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    fn decode_claims(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
