//! Order Module
//!
//! - **factory**: cart + delivery details → `Preparing` order
//! - **lifecycle**: the single active order and its status simulation
//! - **history**: completed orders per identity
//! - **storage** / **memory**: the identity/profile collaborator
//!
//! # Data Flow
//!
//! ```text
//! CartStore ──create_order──▶ Order ──LifecycleEngine::start──▶ Preparing
//!                                                                  │ timers
//!                                                                  ▼
//!                         HistoryStore::append ◀── Completed ◀── Delivering
//! ```

pub mod error;
pub mod factory;
pub mod history;
pub mod lifecycle;
pub mod memory;
pub mod storage;

#[cfg(test)]
pub mod test_support;

pub use error::{OrderError, OrderResult};
pub use factory::create_order;
pub use history::HistoryStore;
pub use lifecycle::{LifecycleEngine, OrderTracking};
pub use memory::MemoryProfileStore;
pub use storage::{PersistenceError, PersistenceResult, ProfileRepository, RedbProfileStore};

pub use shared::order::{ActiveOrderSnapshot, LifecycleEvent, Order, OrderStatus};
