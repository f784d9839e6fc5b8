//! Lifecycle events - broadcast while an order is tracked

use super::snapshot::OrderStatus;
use crate::models::DeliveryPosition;
use serde::{Deserialize, Serialize};

/// Event emitted by the lifecycle engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    /// Order installed as the active order
    Placed { order_id: String },
    /// Status advanced
    StatusChanged {
        order_id: String,
        status: OrderStatus,
    },
    /// Courier moved one tick
    PositionUpdated {
        order_id: String,
        tick: u32,
        position: DeliveryPosition,
    },
    /// Active order cleared before completion
    Cancelled { order_id: String },
}

impl LifecycleEvent {
    pub fn order_id(&self) -> &str {
        match self {
            LifecycleEvent::Placed { order_id }
            | LifecycleEvent::StatusChanged { order_id, .. }
            | LifecycleEvent::PositionUpdated { order_id, .. }
            | LifecycleEvent::Cancelled { order_id } => order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let event = LifecycleEvent::StatusChanged {
            order_id: "A1".to_string(),
            status: OrderStatus::Delivering,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "STATUS_CHANGED");
        assert_eq!(json["status"], "DELIVERING");
        assert_eq!(event.order_id(), "A1");
    }
}
