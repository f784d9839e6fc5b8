//! Order types
//!
//! - Cart lines and delivery details (types)
//! - Orders and their status (snapshot)
//! - Lifecycle events broadcast while an order is tracked (event)

pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use event::LifecycleEvent;
pub use snapshot::{ActiveOrderSnapshot, Order, OrderStatus};
pub use types::*;
