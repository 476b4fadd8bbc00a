//! Validation utilities for the Egg Sales Management system
//!
//! Includes Nigeria-specific phone validation for customer records.

use rust_decimal::Decimal;

// ============================================================================
// Record Field Validations
// ============================================================================

/// Validate a customer's full name (non-empty, at most 200 characters)
pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Full name must not be empty");
    }
    if trimmed.chars().count() > 200 {
        return Err("Full name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a customer's nickname (non-empty, at most 100 characters)
pub fn validate_nickname(nickname: &str) -> Result<(), &'static str> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err("Nickname must not be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Nickname must be at most 100 characters");
    }
    Ok(())
}

/// Validate a unit price: non-negative with at most 2 fractional digits
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price must not be negative");
    }
    if price.normalize().scale() > 2 {
        return Err("Price must have at most 2 decimal places");
    }
    Ok(())
}

/// Validate a crate quantity for stock additions and sales
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

// ============================================================================
// Nigeria-Specific Validations
// ============================================================================

/// Validate a Nigerian phone number
/// Accepts: 08012345678, 0801-234-5678, +2348012345678
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Local format: 11 digits starting with 0 (e.g. 08012345678)
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }

    // International format: 234 prefix followed by the 10 significant digits
    if digits.len() == 13 && digits.starts_with("234") {
        return Ok(());
    }

    Err("Invalid phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn accepts_local_phone_formats() {
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("0801-234-5678").is_ok());
        assert!(validate_phone("+2348012345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phones() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("8012345678").is_err());
        assert!(validate_phone("+4478012345678").is_err());
    }

    #[test]
    fn price_must_be_non_negative() {
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("1200.00")).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }

    #[test]
    fn price_limited_to_two_decimal_places() {
        assert!(validate_price(dec("19.99")).is_ok());
        assert!(validate_price(dec("19.999")).is_err());
        // Trailing zeros beyond 2 places are fine once normalized
        assert!(validate_price(dec("19.9900")).is_ok());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn names_must_be_present_and_bounded() {
        assert!(validate_full_name("Adaeze Obi").is_ok());
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name(&"a".repeat(201)).is_err());
        assert!(validate_nickname("Ada").is_ok());
        assert!(validate_nickname("").is_err());
    }
}
