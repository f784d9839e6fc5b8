//! Order record and status

use super::types::{CartLine, DeliveryDetails};
use crate::models::DeliveryPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
///
/// Ordered: a status only ever moves to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Preparing,
    Delivering,
    Completed,
}

impl OrderStatus {
    /// The status this one advances to, `None` when terminal
    pub const fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Preparing => Some(OrderStatus::Delivering),
            OrderStatus::Delivering => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Preparing => write!(f, "Preparing"),
            OrderStatus::Delivering => write!(f, "Delivering"),
            OrderStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Placed order
///
/// Owns a copy of the cart lines taken at checkout. Only the lifecycle engine
/// changes `status`; `completed_at` and `rating` are stamped when the order
/// is moved into history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub lines: Vec<CartLine>,
    pub total_minor: i64,
    /// Creation time (Unix millis)
    pub created_at: i64,
    pub status: OrderStatus,
    pub delivery: DeliveryDetails,
    /// Completion time (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Customer rating 1..=5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Live view of the tracked order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveOrderSnapshot {
    pub order: Order,
    /// Simulated courier position
    pub position: DeliveryPosition,
    /// Delivery ticks elapsed (0 until delivery starts)
    pub tick: u32,
    pub max_ticks: u32,
}

impl ActiveOrderSnapshot {
    pub fn status(&self) -> OrderStatus {
        self.order.status
    }

    /// Delivery progress in 0.0..=1.0
    pub fn progress(&self) -> f64 {
        if self.max_ticks == 0 {
            return 0.0;
        }
        f64::from(self.tick) / f64::from(self.max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_monotonic() {
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Delivering));
        assert_eq!(OrderStatus::Delivering.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert!(OrderStatus::Preparing < OrderStatus::Delivering);
        assert!(OrderStatus::Delivering < OrderStatus::Completed);
        assert!(OrderStatus::Completed.is_terminal());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Delivering).unwrap();
        assert_eq!(json, "\"DELIVERING\"");
        let status: OrderStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
    }
}
