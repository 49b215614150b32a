//! Item Service
//!
//! Catalogue CRUD. Reads are public; writes need an authenticated caller, and
//! updates and deletes are limited to the item's owner or an admin.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateItemRequest, Item, ItemChanges, ItemListResponse, ItemQuery, ItemSort, ListItemsParams,
    NewItem, UpdateItemRequest, UserContext, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::store::{ItemStore, StoreError};
use crate::utils::error::{format_validation_errors, AppError};

#[derive(Error, Debug)]
pub enum ItemServiceError {
    #[error("Item not found")]
    ItemNotFound,

    /// Caller is neither the item owner nor an admin
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ItemServiceError> for AppError {
    fn from(err: ItemServiceError) -> Self {
        match err {
            ItemServiceError::ItemNotFound => AppError::NotFound("Item not found".to_string()),
            ItemServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ItemServiceError::ValidationError(msg) => AppError::Validation(msg),
            ItemServiceError::Store(e) => e.into(),
        }
    }
}

pub type ItemServiceResult<T> = Result<T, ItemServiceError>;

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self { items }
    }

    /// Turns raw query-string parameters into a store query
    pub fn parse_query(params: ListItemsParams) -> ItemServiceResult<ItemQuery> {
        let sort = match params.sort.as_deref().map(str::trim) {
            None | Some("") => ItemSort::default(),
            Some(raw) => raw
                .parse::<ItemSort>()
                .map_err(|e| ItemServiceError::ValidationError(e.to_string()))?,
        };

        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ItemQuery {
            page: params.page.unwrap_or(1).max(1),
            limit: params
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sort,
            search,
        })
    }

    /// One page of items matching the query
    pub async fn list(&self, params: ListItemsParams) -> ItemServiceResult<ItemListResponse> {
        let query = Self::parse_query(params)?;
        let page = self.items.list(&query).await?;
        let total_pages = query.pagination().total_pages(page.total);

        Ok(ItemListResponse {
            items: page.items,
            page: query.page,
            limit: query.limit,
            total: page.total,
            total_pages,
        })
    }

    pub async fn get(&self, id: Uuid) -> ItemServiceResult<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(ItemServiceError::ItemNotFound)
    }

    /// Creates an item owned by the caller
    pub async fn create(
        &self,
        actor: &UserContext,
        request: CreateItemRequest,
    ) -> ItemServiceResult<Item> {
        request
            .validate()
            .map_err(|e| ItemServiceError::ValidationError(format_validation_errors(&e)))?;

        let item = self
            .items
            .insert(NewItem {
                title: request.title.trim().to_string(),
                description: request.description,
                price: request.price,
                owner_id: actor.user_id,
            })
            .await?;

        log::debug!("User {} created item {}", actor.user_id, item.id);
        Ok(item)
    }

    pub async fn update(
        &self,
        actor: &UserContext,
        id: Uuid,
        request: UpdateItemRequest,
    ) -> ItemServiceResult<Item> {
        request
            .validate()
            .map_err(|e| ItemServiceError::ValidationError(format_validation_errors(&e)))?;

        self.ensure_can_modify(actor, id).await?;

        let changes = ItemChanges {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description,
            price: request.price,
        };

        self.items
            .update(id, changes)
            .await?
            .ok_or(ItemServiceError::ItemNotFound)
    }

    pub async fn delete(&self, actor: &UserContext, id: Uuid) -> ItemServiceResult<()> {
        self.ensure_can_modify(actor, id).await?;

        if !self.items.delete(id).await? {
            return Err(ItemServiceError::ItemNotFound);
        }

        log::info!("User {} deleted item {}", actor.user_id, id);
        Ok(())
    }

    /// Missing items report 404 before ownership is checked
    async fn ensure_can_modify(&self, actor: &UserContext, id: Uuid) -> ItemServiceResult<()> {
        let item = self.get(id).await?;
        if actor.can_act_on(item.owner_id) {
            Ok(())
        } else {
            Err(ItemServiceError::Forbidden(
                "Only the owner or an administrator may modify this item".to_string(),
            ))
        }
    }
}
