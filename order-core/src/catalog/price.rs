//! Price ingestion
//!
//! Catalog prices arrive as display strings (`"Rs. 1,500.00"`). They are
//! parsed exactly once, here, into integer minor units using `rust_decimal`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use thiserror::Error;

/// Minor units per major unit (2 decimal places)
const MINOR_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// Maximum fractional digits a price may carry
const DECIMAL_PLACES: u32 = 2;

/// Highest accepted unit price: Rs. 10,000,000.00
pub const MAX_PRICE_MINOR: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("price is empty: {0:?}")]
    Empty(String),

    #[error("price is not a number: {0:?}")]
    Invalid(String),

    #[error("price is negative: {0:?}")]
    Negative(String),

    #[error("price has more than two decimal places: {0:?}")]
    TooPrecise(String),

    #[error("price out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a decorated price string into minor units.
///
/// Accepts an optional case-insensitive `Rs` / `Rs.` prefix, thousands
/// separators and surrounding whitespace: `"Rs. 1,500.00"` → `150000`.
pub fn parse_price_minor(text: &str) -> Result<i64, PriceParseError> {
    let lowered = text.trim().to_lowercase();
    let body = lowered
        .strip_prefix("rs.")
        .or_else(|| lowered.strip_prefix("rs"))
        .unwrap_or(&lowered);
    let cleaned: String = body
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(PriceParseError::Empty(text.to_string()));
    }

    let value =
        Decimal::from_str(&cleaned).map_err(|_| PriceParseError::Invalid(text.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PriceParseError::Negative(text.to_string()));
    }
    if value.normalize().scale() > DECIMAL_PLACES {
        return Err(PriceParseError::TooPrecise(text.to_string()));
    }

    value
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|minor| minor.to_i64())
        .filter(|minor| *minor <= MAX_PRICE_MINOR)
        .ok_or_else(|| PriceParseError::OutOfRange(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decorated_prices() {
        assert_eq!(parse_price_minor("Rs. 600"), Ok(60000));
        assert_eq!(parse_price_minor("Rs. 1,500.00"), Ok(150000));
        assert_eq!(parse_price_minor("rs 1800"), Ok(180000));
        assert_eq!(parse_price_minor("RS.450.50"), Ok(45050));
        assert_eq!(parse_price_minor("  75.5 "), Ok(7550));
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        assert_eq!(parse_price_minor("Rs. 12.500"), Ok(1250));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_price_minor("Rs."), Err(PriceParseError::Empty(_))));
        assert!(matches!(parse_price_minor(""), Err(PriceParseError::Empty(_))));
        assert!(matches!(parse_price_minor("Rs. abc"), Err(PriceParseError::Invalid(_))));
        assert!(matches!(parse_price_minor("Rs. -5"), Err(PriceParseError::Negative(_))));
        assert!(matches!(parse_price_minor("1.005"), Err(PriceParseError::TooPrecise(_))));
    }

    #[test]
    fn test_price_ceiling() {
        assert_eq!(parse_price_minor("Rs. 10,000,000.00"), Ok(MAX_PRICE_MINOR));
        assert!(matches!(
            parse_price_minor("Rs. 10,000,000.01"),
            Err(PriceParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_price_minor("Rs. 50,000,000,000,000,000"),
            Err(PriceParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(parse_price_minor("Rs. 0"), Ok(0));
    }
}
