//! Customer directory tests
//!
//! Tests for customer field validation and deletion rules:
//! - Name and nickname length limits
//! - Nigerian phone number formats
//! - Customers with purchase history cannot be deleted

use proptest::prelude::*;

/// Mirror of the phone validation used by the customer service: non-digit
/// separators are stripped before the length and prefix checks
fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.len() == 11 && digits.starts_with('0'))
        || (digits.len() == 13 && digits.starts_with("234"))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Accepted local and international phone formats
    #[test]
    fn test_valid_phone_numbers() {
        assert!(is_valid_phone("08012345678"));
        assert!(is_valid_phone("07098765432"));
        assert!(is_valid_phone("2348012345678"));
        // Separators are stripped before validation
        assert!(is_valid_phone("0801-234-5678"));
        assert!(is_valid_phone("+2348012345678"));
    }

    /// Rejected phone formats
    #[test]
    fn test_invalid_phone_numbers() {
        // Wrong lengths
        assert!(!is_valid_phone("0801234567"));
        assert!(!is_valid_phone("080123456789"));
        // Local number without the leading zero
        assert!(!is_valid_phone("18012345678"));
        // Wrong country prefix
        assert!(!is_valid_phone("+4478012345678"));
    }

    /// Full names must be non-empty after trimming
    #[test]
    fn test_full_name_required() {
        for name in ["", "   ", "\t"] {
            assert!(name.trim().is_empty());
        }
        assert!(!"Amina Bello".trim().is_empty());
    }

    /// Name length limits
    #[test]
    fn test_name_length_limits() {
        let full_name = "a".repeat(200);
        assert!(full_name.len() <= 200);

        let too_long = "a".repeat(201);
        assert!(too_long.len() > 200);

        let nickname = "n".repeat(100);
        assert!(nickname.len() <= 100);
        assert!("n".repeat(101).len() > 100);
    }

    /// A customer with recorded sales is protected from deletion
    #[test]
    fn test_delete_blocked_by_history() {
        let transaction_count = 3;
        let can_delete = transaction_count == 0;
        assert!(!can_delete);
    }

    /// A customer without sales can be deleted
    #[test]
    fn test_delete_allowed_without_history() {
        let transaction_count = 0;
        let can_delete = transaction_count == 0;
        assert!(can_delete);
    }

    /// Lifetime spend over an empty history is zero, not null
    #[test]
    fn test_total_spent_defaults_to_zero() {
        let totals: Vec<i64> = vec![];
        let total_spent: i64 = totals.iter().sum();
        assert_eq!(total_spent, 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Every 11-digit number starting with 0 is accepted
    #[test]
    fn prop_local_phone_accepted(rest in "[0-9]{10}") {
        let phone = format!("0{}", rest);
        prop_assert!(is_valid_phone(&phone));
    }

    /// Every 13-digit number starting with 234 is accepted
    #[test]
    fn prop_international_phone_accepted(rest in "[0-9]{10}") {
        let phone = format!("234{}", rest);
        prop_assert!(is_valid_phone(&phone));
    }

    /// Digit strings of any other length are rejected
    #[test]
    fn prop_wrong_length_rejected(digits in "[0-9]{1,20}") {
        prop_assume!(digits.len() != 11 && digits.len() != 13);
        prop_assert!(!is_valid_phone(&digits));
    }
}
