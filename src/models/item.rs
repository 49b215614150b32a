//! Item Model
//!
//! The generic catalogue resource plus the listing query it is searched with.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Pagination;

/// Default page size for item listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on page size for item listings
pub const MAX_PAGE_SIZE: u32 = 100;

/// Item as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// User who created the item
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub owner_id: Uuid,
}

/// Partial update applied to a stored item; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Field an item listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Price,
}

impl ItemSortField {
    /// Column name in the items table
    pub fn column(&self) -> &'static str {
        match self {
            ItemSortField::CreatedAt => "created_at",
            ItemSortField::UpdatedAt => "updated_at",
            ItemSortField::Title => "title",
            ItemSortField::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Ordering for item listings, parsed from `sort=price` / `sort=-price`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSort {
    pub field: ItemSortField,
    pub direction: SortDirection,
}

impl Default for ItemSort {
    /// Newest first
    fn default() -> Self {
        Self {
            field: ItemSortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

/// Error returned for an unsupported sort field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot sort items by '{0}'")]
pub struct InvalidSort(pub String);

impl FromStr for ItemSort {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (direction, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (
                SortDirection::Ascending,
                trimmed.strip_prefix('+').unwrap_or(trimmed),
            ),
        };

        let field = match name {
            "created_at" | "createdAt" => ItemSortField::CreatedAt,
            "updated_at" | "updatedAt" => ItemSortField::UpdatedAt,
            "title" => ItemSortField::Title,
            "price" => ItemSortField::Price,
            _ => return Err(InvalidSort(s.to_string())),
        };

        Ok(Self { field, direction })
    }
}

impl ItemSort {
    /// Orders two items the way the SQL `ORDER BY <column> <dir>, id` does
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let ordering = match self.field {
            ItemSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            ItemSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            ItemSortField::Title => a.title.cmp(&b.title),
            ItemSortField::Price => a.price.total_cmp(&b.price),
        };

        let ordering = match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };

        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

/// Validated listing query handed to the item store
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size, clamped to `1..=MAX_PAGE_SIZE`
    pub limit: u32,
    pub sort: ItemSort,
    /// Case-insensitive substring matched against title and description
    pub search: Option<String>,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort: ItemSort::default(),
            search: None,
        }
    }
}

impl ItemQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    /// Whether an item matches the search term
    pub fn matches(&self, item: &Item) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                item.title.to_lowercase().contains(&term)
                    || item.description.to_lowercase().contains(&term)
            }
        }
    }
}

/// One page of an item listing plus the unpaged total
#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str, price: f64) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            price,
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(
            "price".parse::<ItemSort>().unwrap(),
            ItemSort {
                field: ItemSortField::Price,
                direction: SortDirection::Ascending
            }
        );
        assert_eq!(
            "-createdAt".parse::<ItemSort>().unwrap(),
            ItemSort {
                field: ItemSortField::CreatedAt,
                direction: SortDirection::Descending
            }
        );
        assert_eq!(
            "+title".parse::<ItemSort>().unwrap().field,
            ItemSortField::Title
        );
        assert!("password_hash".parse::<ItemSort>().is_err());
        assert!("".parse::<ItemSort>().is_err());
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let sort = ItemSort::default();
        assert_eq!(sort.field, ItemSortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(sort.field.column(), "created_at");
        assert_eq!(sort.direction.keyword(), "DESC");
    }

    #[test]
    fn test_compare_by_price() {
        let cheap = item("Pen", "", 1.5);
        let pricey = item("Desk", "", 150.0);

        let ascending: ItemSort = "price".parse().unwrap();
        assert_eq!(ascending.compare(&cheap, &pricey), Ordering::Less);

        let descending: ItemSort = "-price".parse().unwrap();
        assert_eq!(descending.compare(&cheap, &pricey), Ordering::Greater);
    }

    #[test]
    fn test_search_matching_is_case_insensitive() {
        let lamp = item("Desk Lamp", "Warm LED light", 30.0);
        let query = ItemQuery {
            search: Some("led".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&lamp));

        let query = ItemQuery {
            search: Some("chair".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&lamp));
        assert!(ItemQuery::default().matches(&lamp));
    }

    #[test]
    fn test_query_pagination() {
        let query = ItemQuery {
            page: 3,
            limit: 20,
            ..Default::default()
        };
        let pagination = query.pagination();
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 40);
    }
}
