use super::storage::PersistenceError;
use shared::ErrorCode;
use shared::order::OrderStatus;
use thiserror::Error;

/// Order errors
///
/// All variants are local, recoverable conditions; none is fatal to the
/// process. Persistence failures are always surfaced, never retried here.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Delivery details incomplete: {field} is required")]
    IncompleteDelivery { field: &'static str },

    #[error("Order already in progress: {order_id}")]
    ActiveOrderExists { order_id: String },

    #[error("Order cancelled: {order_id}")]
    Cancelled { order_id: String },

    #[error("Order {order_id} is {status}, expected {expected}")]
    InvalidState {
        order_id: String,
        status: OrderStatus,
        expected: OrderStatus,
    },

    #[error("No order in progress")]
    NoActiveOrder,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl OrderError {
    /// 将错误转换为错误码（前端负责本地化）
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::EmptyCart => ErrorCode::EmptyCart,
            OrderError::IncompleteDelivery { .. } => ErrorCode::IncompleteDelivery,
            OrderError::ActiveOrderExists { .. } => ErrorCode::ActiveOrderExists,
            OrderError::Cancelled { .. } => ErrorCode::OrderCancelled,
            OrderError::InvalidState { .. } => ErrorCode::InvalidOrderState,
            OrderError::NoActiveOrder => ErrorCode::NoActiveOrder,
            OrderError::Validation(_) => ErrorCode::ValidationFailed,
            OrderError::Persistence(_) => ErrorCode::PersistenceFailed,
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
