//! User Service Implementation
//!
//! Business logic for listing, reading, updating and deleting accounts under
//! the owner-or-admin rule.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    NewUser, RegisterRequest, Role, UpdateUserRequest, User, UserChanges, UserContext,
};
use crate::store::{StoreError, UserStore};
use crate::utils::{
    error::{format_validation_errors, AppError},
    security::{hash_password_with_cost, DEFAULT_BCRYPT_COST},
    validation::normalize_email,
};

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// User with the specified identifier was not found
    #[error("User not found")]
    UserNotFound,

    /// Attempted to take an email that already belongs to another account
    #[error("Email already exists")]
    DuplicateEmail,

    /// Caller is neither the account owner nor an admin
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),
}

impl From<StoreError> for UserServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => UserServiceError::DuplicateEmail,
            other => UserServiceError::Store(other),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::DuplicateEmail => {
                AppError::Conflict("Email already exists".to_string())
            }
            UserServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            UserServiceError::ValidationError(msg) => AppError::Validation(msg),
            UserServiceError::Store(e) => e.into(),
            UserServiceError::HashingError(e) => AppError::HashingError(e),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Account management service
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,

    /// bcrypt cost factor for re-hashing changed passwords
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self::with_bcrypt_cost(users, DEFAULT_BCRYPT_COST)
    }

    pub fn with_bcrypt_cost(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Verifies the user store is reachable
    pub async fn health_check(&self) -> UserServiceResult<()> {
        self.users.ping().await?;
        Ok(())
    }

    /// All accounts; the route is admin-gated
    pub async fn list_users(&self) -> UserServiceResult<Vec<User>> {
        let records = self.users.list().await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    /// Retrieves a user by ID if the caller owns it or is an admin
    pub async fn get_user(&self, actor: &UserContext, id: Uuid) -> UserServiceResult<User> {
        Self::ensure_can_act(actor, id)?;

        self.users
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or(UserServiceError::UserNotFound)
    }

    /// Applies a partial update; only admins may change roles
    pub async fn update_user(
        &self,
        actor: &UserContext,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> UserServiceResult<User> {
        Self::ensure_can_act(actor, id)?;

        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format_validation_errors(&e)))?;

        if request.role.is_some() && !actor.is_admin() {
            return Err(UserServiceError::Forbidden(
                "Only administrators may change roles".to_string(),
            ));
        }

        let password_hash = match &request.password {
            Some(password) => Some(hash_password_with_cost(password, self.bcrypt_cost)?),
            None => None,
        };

        let changes = UserChanges {
            name: request.name.map(|n| n.trim().to_string()),
            email: request.email.as_deref().map(normalize_email),
            password_hash,
            role: request.role,
        };

        if changes.is_empty() {
            return self
                .users
                .find_by_id(id)
                .await?
                .map(User::from)
                .ok_or(UserServiceError::UserNotFound);
        }

        let role_change = changes.role;
        let updated = self
            .users
            .update(id, changes)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        if let Some(role) = role_change {
            log::info!("User {} set role of {} to {}", actor.user_id, id, role);
        }

        Ok(updated.into())
    }

    /// Deletes an account; the store removes the items it owns with it
    pub async fn delete_user(&self, actor: &UserContext, id: Uuid) -> UserServiceResult<()> {
        Self::ensure_can_act(actor, id)?;

        if !self.users.delete(id).await? {
            return Err(UserServiceError::UserNotFound);
        }

        log::info!("User {} deleted account {}", actor.user_id, id);
        Ok(())
    }

    /// Grants the admin role to the account with this email
    pub async fn promote_by_email(&self, email: &str) -> UserServiceResult<User> {
        let record = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        let changes = UserChanges {
            role: Some(Role::Admin),
            ..Default::default()
        };
        let updated = self
            .users
            .update(record.id, changes)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        log::info!("Promoted user {} to admin", updated.id);
        Ok(updated.into())
    }

    /// Creates an account with the admin role, bypassing registration
    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> UserServiceResult<User> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format_validation_errors(&e)))?;

        let record = self
            .users
            .insert(NewUser {
                name: request.name.trim().to_string(),
                email: normalize_email(&request.email),
                password_hash: hash_password_with_cost(&request.password, self.bcrypt_cost)?,
                role: Role::Admin,
            })
            .await?;

        log::info!("Created admin user {}", record.id);
        Ok(record.into())
    }

    fn ensure_can_act(actor: &UserContext, id: Uuid) -> UserServiceResult<()> {
        if actor.can_act_on(id) {
            Ok(())
        } else {
            Err(UserServiceError::Forbidden(
                "You may only manage your own account".to_string(),
            ))
        }
    }
}
