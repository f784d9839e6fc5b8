//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 4xxx: Order ====================
    /// Cart has no lines
    EmptyCart = 4001,
    /// Delivery details are missing a required field
    IncompleteDelivery = 4002,
    /// Another order is already being tracked
    ActiveOrderExists = 4003,
    /// Order was cleared before completion
    OrderCancelled = 4004,
    /// Order is not in the status the operation requires
    InvalidOrderState = 4005,
    /// No order is being tracked
    NoActiveOrder = 4006,

    // ==================== 6xxx: Catalog ====================
    /// Price text could not be parsed
    InvalidPrice = 6001,
    /// Catalog document has an unexpected shape
    InvalidCatalog = 6002,

    // ==================== 9xxx: System ====================
    /// Persistence collaborator unavailable or failed
    PersistenceFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the caller may retry the same operation unchanged
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::PersistenceFailed)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::EmptyCart => "Cart is empty",
            ErrorCode::IncompleteDelivery => "Delivery details are incomplete",
            ErrorCode::ActiveOrderExists => "An order is already in progress",
            ErrorCode::OrderCancelled => "Order was cancelled",
            ErrorCode::InvalidOrderState => "Order is in an invalid state for this operation",
            ErrorCode::NoActiveOrder => "No order in progress",
            ErrorCode::InvalidPrice => "Invalid price",
            ErrorCode::InvalidCatalog => "Invalid catalog data",
            ErrorCode::PersistenceFailed => "Storage is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            4001 => Ok(ErrorCode::EmptyCart),
            4002 => Ok(ErrorCode::IncompleteDelivery),
            4003 => Ok(ErrorCode::ActiveOrderExists),
            4004 => Ok(ErrorCode::OrderCancelled),
            4005 => Ok(ErrorCode::InvalidOrderState),
            4006 => Ok(ErrorCode::NoActiveOrder),
            6001 => Ok(ErrorCode::InvalidPrice),
            6002 => Ok(ErrorCode::InvalidCatalog),
            9101 => Ok(ErrorCode::PersistenceFailed),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
