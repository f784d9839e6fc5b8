//! Catalog ingestion
//!
//! Turns the raw catalog document (categories + food items with display
//! prices) into typed [`Menu`] entries. Unknown fields and unparsable prices
//! are rejected at this boundary so nothing untyped reaches the cart.

pub mod price;

pub use price::{MAX_PRICE_MINOR, PriceParseError, parse_price_minor};

use serde::Deserialize;
use shared::ErrorCode;
use shared::models::{Category, MenuItem};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid price for item {item_id}: {source}")]
    Price {
        item_id: i64,
        #[source]
        source: PriceParseError,
    },

    #[error("Duplicate item id: {0}")]
    DuplicateItem(i64),

    #[error("Item {item_id} references unknown category {category_id}")]
    UnknownCategory { item_id: i64, category_id: i64 },
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::Price { .. } => ErrorCode::InvalidPrice,
            _ => ErrorCode::InvalidCatalog,
        }
    }
}

/// Raw category record
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    id: i64,
    name: String,
    #[serde(default)]
    icon: String,
}

/// Raw food item record, price still a display string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawMenuItem {
    id: i64,
    category_id: i64,
    name: String,
    price: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCatalog {
    categories: Vec<RawCategory>,
    food_items: Vec<RawMenuItem>,
}

/// Typed, validated menu
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    categories: Vec<Category>,
    items: Vec<MenuItem>,
}

impl Menu {
    /// Parse a `{ "categories": [...], "foodItems": [...] }` document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;

        let categories: Vec<Category> = raw
            .categories
            .into_iter()
            .map(|c| Category {
                id: c.id,
                name: c.name,
                icon: c.icon,
            })
            .collect();

        let items = raw
            .food_items
            .into_iter()
            .map(|raw| {
                let price_minor = parse_price_minor(&raw.price).map_err(|source| {
                    CatalogError::Price {
                        item_id: raw.id,
                        source,
                    }
                })?;
                Ok(MenuItem {
                    id: raw.id,
                    category_id: raw.category_id,
                    name: raw.name,
                    price_minor,
                    rating: raw.rating,
                    image: raw.image,
                    description: raw.description,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let menu = Self::new(categories, items)?;
        tracing::info!(
            categories = menu.categories.len(),
            items = menu.items.len(),
            "Catalog loaded"
        );
        Ok(menu)
    }

    /// Build a menu from already-typed entries
    pub fn new(categories: Vec<Category>, items: Vec<MenuItem>) -> Result<Self, CatalogError> {
        let category_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            if !(0..=MAX_PRICE_MINOR).contains(&item.price_minor) {
                return Err(CatalogError::Price {
                    item_id: item.id,
                    source: PriceParseError::OutOfRange(item.price_minor.to_string()),
                });
            }
            if !category_ids.contains(&item.category_id) {
                return Err(CatalogError::UnknownCategory {
                    item_id: item.id,
                    category_id: item.category_id,
                });
            }
        }
        Ok(Self { categories, items })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn by_category(&self, category_id: i64) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .collect()
    }

    /// Case-insensitive name search; a blank query matches nothing
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Home screen listing: search results while a query is typed,
    /// otherwise the selected category.
    pub fn visible(&self, query: &str, category_id: i64) -> Vec<&MenuItem> {
        if query.trim().is_empty() {
            self.by_category(category_id)
        } else {
            self.search(query)
        }
    }
}

#[cfg(test)]
mod tests;
