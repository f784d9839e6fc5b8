//! Error codes shared with UI shells
//!
//! The core returns rich Rust errors; UI shells only need a stable number to
//! pick a localized message. Every core error maps onto one [`ErrorCode`].
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

mod codes;

pub use codes::{ErrorCode, InvalidErrorCode};
