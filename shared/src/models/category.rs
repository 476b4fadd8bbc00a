//! Egg category enumeration
//!
//! The closed set of product sizes used as the join key across prices,
//! stock, stock records, and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Egg size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EggCategory {
    Small,
    Medium,
    Large,
}

impl EggCategory {
    pub const ALL: [EggCategory; 3] = [EggCategory::Small, EggCategory::Medium, EggCategory::Large];

    /// Stored representation, used as the database key
    pub fn as_str(&self) -> &'static str {
        match self {
            EggCategory::Small => "SMALL",
            EggCategory::Medium => "MEDIUM",
            EggCategory::Large => "LARGE",
        }
    }

    /// Human-readable label for lists, invoices, and exports
    pub fn display_name(&self) -> &'static str {
        match self {
            EggCategory::Small => "Small Eggs",
            EggCategory::Medium => "Medium Eggs",
            EggCategory::Large => "Large Eggs",
        }
    }
}

impl FromStr for EggCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SMALL" => Ok(EggCategory::Small),
            "MEDIUM" => Ok(EggCategory::Medium),
            "LARGE" => Ok(EggCategory::Large),
            _ => Err("Unknown egg category"),
        }
    }
}

impl fmt::Display for EggCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_stored_form() {
        for category in EggCategory::ALL {
            assert_eq!(category.as_str().parse::<EggCategory>(), Ok(category));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("medium".parse::<EggCategory>(), Ok(EggCategory::Medium));
    }

    #[test]
    fn rejects_unknown_category() {
        assert!("JUMBO".parse::<EggCategory>().is_err());
    }
}
