//! Catalog Models
//!
//! Normalized catalog entries. Prices are parsed into minor units when the
//! catalog is ingested; nothing downstream re-parses display strings.

use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Icon name for the presentation layer
    pub icon: String,
}

/// Menu item (orderable product)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    /// Unit price in minor units (cents)
    pub price_minor: i64,
    pub rating: f64,
    pub image: String,
    pub description: String,
}
