//! Data models
//!
//! Shared between order-core and UI shells. Money is always integer minor
//! units; coordinates are opaque degree pairs.

pub mod geo;
pub mod product;
pub mod profile;

// Re-exports
pub use geo::*;
pub use product::*;
pub use profile::*;
