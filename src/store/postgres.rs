//! PostgreSQL record store
//!
//! SQLx-backed implementation of the user and item stores. Queries are built
//! at runtime so the crate compiles without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult, UserStore};
use crate::models::{
    Item, ItemChanges, ItemPage, ItemQuery, NewItem, NewUser, Role, UserChanges, UserRecord,
};
use crate::utils::validation::escape_like_pattern;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, title, description, price, owner_id, created_at, updated_at";

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: crate::models::UnknownRole| StoreError::Corrupt(e.to_string()))?;

        Ok(UserRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    title: String,
    description: String,
    price: f64,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Maps a unique violation on the users email index to [`StoreError::DuplicateEmail`]
fn map_user_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(err)
}

/// Maps a foreign key violation on `items.owner_id` to [`StoreError::UnknownOwner`]
fn map_item_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::UnknownOwner;
        }
    }
    StoreError::Database(err)
}

/// Appends the search filter shared by the count and page queries
fn push_search_filter(builder: &mut QueryBuilder<'_, Postgres>, search: Option<&str>) {
    if let Some(term) = search {
        let pattern = format!("%{}%", escape_like_pattern(term));
        builder
            .push(" WHERE (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_write_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRecord::try_from)
            .collect()
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<UserRecord>> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_user_write_error)?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        // items.owner_id cascades
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn insert(&self, item: NewItem) -> StoreResult<Item> {
        let sql = format!(
            "INSERT INTO items (id, title, description, price, owner_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ITEM_COLUMNS
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_item_insert_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Item>> {
        let sql = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Item::from))
    }

    async fn list(&self, query: &ItemQuery) -> StoreResult<ItemPage> {
        let search = query.search.as_deref();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM items");
        push_search_filter(&mut count, search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let pagination = query.pagination();
        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM items", ITEM_COLUMNS));
        push_search_filter(&mut select, search);
        // Column and direction come from closed enums, never from user input
        select
            .push(" ORDER BY ")
            .push(query.sort.field.column())
            .push(" ")
            .push(query.sort.direction.keyword())
            .push(", id LIMIT ")
            .push_bind(pagination.limit)
            .push(" OFFSET ")
            .push_bind(pagination.offset);

        let rows: Vec<ItemRow> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok(ItemPage {
            items: rows.into_iter().map(Item::from).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> StoreResult<Option<Item>> {
        let sql = format!(
            r#"
            UPDATE items SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.price)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Item::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
