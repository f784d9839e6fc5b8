//! Cart and delivery types

use crate::models::{Coordinates, MenuItem, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Cart Line
// ============================================================================

/// One distinct product in a cart with its aggregated quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (unique within a cart)
    pub product_id: i64,
    /// Product name snapshot
    pub name: String,
    /// Unit price in minor units
    pub unit_price_minor: i64,
    /// Quantity, always >= 1
    pub quantity: u32,
}

impl CartLine {
    /// Create a line for `item`; a zero quantity is raised to 1
    pub fn from_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            product_id: item.id,
            name: item.name.clone(),
            unit_price_minor: item.price_minor,
            quantity: quantity.max(1),
        }
    }

    /// unit price × quantity, saturating at `i64::MAX`
    pub fn total_minor(&self) -> i64 {
        self.unit_price_minor.saturating_mul(i64::from(self.quantity))
    }

    /// unit price × quantity, `None` on overflow
    pub fn checked_total_minor(&self) -> Option<i64> {
        self.unit_price_minor.checked_mul(i64::from(self.quantity))
    }
}

/// Quantity stepper direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityChange {
    Increase,
    Decrease,
}

// ============================================================================
// Payment / Delivery
// ============================================================================

/// Payment method chosen at checkout (no real processing happens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Saved card on file
    SavedCard,
    /// 货到付款
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::SavedCard => write!(f, "Saved Card"),
            PaymentMethod::CashOnDelivery => write!(f, "Cash On Delivery"),
        }
    }
}

/// Delivery details attached to a placed order (immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub contact_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub coordinates: Coordinates,
}

/// Delivery form input, possibly incomplete
///
/// Validated into [`DeliveryDetails`] when an order is created.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryDraft {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl DeliveryDraft {
    /// Prefill the form from the identity profile
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            contact_name: profile.full_name.clone(),
            contact_phone: profile.phone.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
            coordinates: profile.coordinates,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}
