//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! delivery form and customer ratings.

use crate::orders::{OrderError, OrderResult};

// ── Text length limits ──────────────────────────────────────────────

/// Contact names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Customer rating range (stars)
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a required field: non-blank and within the length limit.
///
/// Blank input is reported as an incomplete delivery, not a validation error.
pub fn validate_required_field(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> OrderResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrderError::IncompleteDelivery { field });
    }
    check_len(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

/// Validate an optional field; blank input becomes `None`.
pub fn validate_optional_field(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> OrderResult<Option<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_len(trimmed, field, max_len)?;
    Ok(Some(trimmed.to_string()))
}

/// Validate a 1..=5 star rating
pub fn validate_rating(rating: u8) -> OrderResult<u8> {
    if !RATING_RANGE.contains(&rating) {
        return Err(OrderError::Validation(format!(
            "rating must be between {} and {}, got {rating}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )));
    }
    Ok(rating)
}

fn check_len(value: &str, field: &str, max_len: usize) -> OrderResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}
