//! Shared types for the food-ordering core
//!
//! Plain data types used by `order-core` and by UI shells: catalog entries,
//! cart lines, orders, delivery details, lifecycle events and error codes.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::ErrorCode;
pub use serde::{Deserialize, Serialize};
