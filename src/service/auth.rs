//! Authentication Service
//!
//! Registration, credential login and profile lookup.

use std::sync::Arc;

use thiserror::Error;
use validator::Validate;

use crate::models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User, UserContext};
use crate::service::jwt::{JwtService, TokenError};
use crate::store::{StoreError, UserStore};
use crate::utils::{
    error::{format_validation_errors, AppError},
    security::{hash_password_with_cost, verify_dummy_password, verify_password, DEFAULT_BCRYPT_COST},
    validation::normalize_email,
};

/// Errors raised by the authentication service
#[derive(Error, Debug)]
pub enum AuthServiceError {
    /// Registration attempted with an email that already exists
    #[error("Email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two are indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account named by a valid token no longer exists
    #[error("User not found")]
    UserNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl From<StoreError> for AuthServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthServiceError::DuplicateEmail,
            other => AuthServiceError::Store(other),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::DuplicateEmail => {
                AppError::Conflict("Email already exists".to_string())
            }
            AuthServiceError::InvalidCredentials => {
                AppError::Authentication("Invalid credentials".to_string())
            }
            AuthServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            AuthServiceError::Validation(msg) => AppError::Validation(msg),
            AuthServiceError::Store(e) => e.into(),
            AuthServiceError::Hashing(e) => AppError::HashingError(e),
            AuthServiceError::Token(e) => AppError::Internal(e.to_string()),
        }
    }
}

pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// Credential handling on top of the user store and the token signer
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: Arc<JwtService>,
    /// bcrypt cost factor for password hashing
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_service: Arc<JwtService>) -> Self {
        Self::with_bcrypt_cost(users, jwt_service, DEFAULT_BCRYPT_COST)
    }

    pub fn with_bcrypt_cost(
        users: Arc<dyn UserStore>,
        jwt_service: Arc<JwtService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            jwt_service,
            bcrypt_cost,
        }
    }

    /// Register a new account with the `user` role
    pub async fn register(&self, request: RegisterRequest) -> AuthServiceResult<User> {
        request
            .validate()
            .map_err(|e| AuthServiceError::Validation(format_validation_errors(&e)))?;

        let email = normalize_email(&request.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::DuplicateEmail);
        }

        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)?;

        // The store's uniqueness check still guards the race between lookup and insert
        let record = self
            .users
            .insert(NewUser {
                name: request.name.trim().to_string(),
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        log::info!("Registered user {}", record.id);
        Ok(record.into())
    }

    /// Verify credentials and issue a bearer token
    pub async fn login(&self, request: LoginRequest) -> AuthServiceResult<LoginResponse> {
        request
            .validate()
            .map_err(|e| AuthServiceError::Validation(format_validation_errors(&e)))?;

        let email = normalize_email(&request.email);
        let Some(record) = self.users.find_by_email(&email).await? else {
            verify_dummy_password(&request.password, self.bcrypt_cost);
            log::warn!("Login failed: unknown email");
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(&request.password, &record.password_hash)? {
            log::warn!("Login failed for user {}", record.id);
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self.jwt_service.issue_token(record.id, record.role)?;
        log::info!("User {} logged in", record.id);

        Ok(LoginResponse {
            token,
            user: record.into(),
        })
    }

    /// Current record of the authenticated caller
    pub async fn profile(&self, actor: &UserContext) -> AuthServiceResult<User> {
        self.users
            .find_by_id(actor.user_id)
            .await?
            .map(User::from)
            .ok_or(AuthServiceError::UserNotFound)
    }
}
