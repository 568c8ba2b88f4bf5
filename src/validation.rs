// Validation utilities module
// Custom validators used by the price request schema

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a currency is a three-letter uppercase code such as "USD"
pub fn validate_currency_code(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_currency_code");
        err.message = Some("Currency must be a three-letter uppercase code".into());
        Err(err)
    }
}

/// Largest number of decimal places a stored price keeps
pub const PRICE_MAX_SCALE: u32 = 4;

/// Exclusive upper bound of a price value, matching the `NUMERIC(12, 4)` column
pub fn price_upper_bound() -> Decimal {
    Decimal::new(100_000_000, 0)
}

/// Validates that a price value fits the stored column: zero or positive,
/// below 100,000,000 and with at most four decimal places
pub fn validate_price_value(value: &Decimal) -> Result<(), ValidationError> {
    let (code, message) = if value.is_sign_negative() && !value.is_zero() {
        ("price_must_not_be_negative", "Price value must not be negative")
    } else if *value >= price_upper_bound() {
        ("price_out_of_range", "Price value must be less than 100000000")
    } else if value.normalize().scale() > PRICE_MAX_SCALE {
        ("price_too_precise", "Price value must have at most 4 decimal places")
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}
