//! In-memory record store
//!
//! Backs the server when `STORAGE_BACKEND=memory` and the HTTP tests. Data
//! lives for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult, UserStore};
use crate::models::{
    Item, ItemChanges, ItemPage, ItemQuery, NewItem, NewUser, UserChanges, UserRecord,
};

/// Process-local user and item maps behind async read/write locks
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<UserRecord>> {
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let Some(record) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        // Lock order is users then items, same as item insert
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Ok(false);
        }
        self.items.write().await.retain(|_, item| item.owner_id != id);
        Ok(true)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert(&self, item: NewItem) -> StoreResult<Item> {
        let users = self.users.read().await;
        if !users.contains_key(&item.owner_id) {
            return Err(StoreError::UnknownOwner);
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            title: item.title,
            description: item.description,
            price: item.price,
            owner_id: item.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.items.write().await.insert(item.id, item.clone());

        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list(&self, query: &ItemQuery) -> StoreResult<ItemPage> {
        let items = self.items.read().await;

        let mut matching: Vec<&Item> = items.values().filter(|item| query.matches(item)).collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as u64;
        let pagination = query.pagination();
        let page = matching
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        Ok(ItemPage { items: page, total })
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> StoreResult<Option<Item>> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

}
