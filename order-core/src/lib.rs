//! Order Core - 外卖点餐客户端核心库
//!
//! # 架构概述
//!
//! The embedded core of a food-ordering client. UI shells drive a
//! [`Session`] and render what it exposes:
//!
//! - **购物车** (`cart`): in-memory cart lines, merge and quantity rules
//! - **菜单** (`catalog`): catalog ingestion and price parsing
//! - **订单** (`orders`): factory, lifecycle engine, history store, persistence
//! - **会话** (`session`): per-identity owner of all of the above
//!
//! # 模块结构
//!
//! ```text
//! order-core/src/
//! ├── core/          # 配置、后台任务
//! ├── cart/          # 购物车
//! ├── catalog/       # 菜单与价格解析
//! ├── orders/        # 订单工厂、生命周期、历史、存储
//! ├── session.rs     # 用户会话
//! └── utils/         # 日志、校验
//! ```

pub mod cart;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod session;
pub mod utils;

// Re-export 公共类型
pub use cart::CartStore;
pub use catalog::{CatalogError, Menu, PriceParseError, parse_price_minor};
pub use crate::core::{Config, SimulationConfig};
pub use orders::{
    HistoryStore, LifecycleEngine, MemoryProfileStore, OrderError, OrderResult, OrderTracking,
    PersistenceError, ProfileRepository, RedbProfileStore, create_order,
};
pub use session::Session;

// Re-export shared types
pub use shared::ErrorCode;
pub use shared::models::{Category, Coordinates, DeliveryPosition, MenuItem, UserProfile};
pub use shared::order::{
    ActiveOrderSnapshot, CartLine, DeliveryDetails, DeliveryDraft, LifecycleEvent, Order,
    OrderStatus, PaymentMethod, QuantityChange,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialise logging from the environment.
///
/// Returns the resolved [`Config`]. Call once at shell startup.
pub fn setup_environment() -> Config {
    // .env is optional
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        preparation_ms = config.simulation.preparation_delay.as_millis() as u64,
        ticks = config.simulation.max_ticks,
        "Environment ready"
    );
    config
}
