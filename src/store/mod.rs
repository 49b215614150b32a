//! Record Stores
//!
//! Persistence seams for users and items. Services only talk to these traits;
//! the server picks [`PgStore`] or [`MemoryStore`] at startup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Item, ItemChanges, ItemPage, ItemQuery, NewItem, NewUser, UserChanges, UserRecord,
};
use crate::utils::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Email uniqueness constraint was violated
    #[error("Email address is already registered")]
    DuplicateEmail,

    /// The item owner has no account, e.g. a token outliving its user
    #[error("Owner account does not exist")]
    UnknownOwner,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a model
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::Conflict("Email already exists".to_string()),
            StoreError::UnknownOwner => {
                AppError::Authentication("Account no longer exists".to_string())
            }
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Corrupt(msg) => AppError::Internal(msg),
        }
    }
}

/// Persistence port for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails with [`StoreError::DuplicateEmail`] on a taken email.
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    /// Look up by normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// All users, oldest first.
    async fn list(&self) -> StoreResult<Vec<UserRecord>>;

    /// Apply `changes`, returning the updated record or `None` if the user is gone.
    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<UserRecord>>;

    /// Removes the user and every item they own; returns whether a user was removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Liveness check used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Persistence port for catalogue items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fails with [`StoreError::UnknownOwner`] if `owner_id` has no account.
    async fn insert(&self, item: NewItem) -> StoreResult<Item>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Item>>;

    /// One filtered, ordered page plus the total number of matches.
    async fn list(&self, query: &ItemQuery) -> StoreResult<ItemPage>;

    async fn update(&self, id: Uuid, changes: ItemChanges) -> StoreResult<Option<Item>>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
