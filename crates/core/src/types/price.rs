//! Service pricing in integer minor currency units.
//!
//! All amounts are Indian rupees expressed in paise (₹1 = 100 paise), the
//! unit the payment gateway's orders API expects. Conversion to display
//! units goes through `rust_decimal` so no floating point is involved.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fallback price for service types not in the fixed table, in paise.
pub const DEFAULT_SERVICE_PRICE: Amount = Amount::from_paise(3999);

/// Fixed price table: service name to price in paise.
const PRICE_TABLE: &[(&str, i64)] = &[
    ("Oil Change", 2999),
    ("Brake Service", 4999),
    ("Engine Diagnostic", 3999),
    ("Tire Rotation", 1999),
    ("Battery Replacement", 5999),
    ("AC Service", 3499),
    ("Full Service", 7999),
];

/// A monetary amount in paise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from a paise value.
    #[must_use]
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// The raw paise value.
    #[must_use]
    pub const fn as_paise(&self) -> i64 {
        self.0
    }

    /// The amount in rupees as a decimal (e.g. `29.99` for 2999 paise).
    #[must_use]
    pub fn as_rupees(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.as_rupees())
    }
}

/// Resolve the price for a service type.
///
/// Pure and total: unknown or custom service strings fall back to
/// [`DEFAULT_SERVICE_PRICE`] rather than failing.
#[must_use]
pub fn resolve_amount(service_type: &str) -> Amount {
    PRICE_TABLE
        .iter()
        .find(|(name, _)| *name == service_type)
        .map_or(DEFAULT_SERVICE_PRICE, |(_, paise)| Amount::from_paise(*paise))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_services() {
        assert_eq!(resolve_amount("Oil Change").as_paise(), 2999);
        assert_eq!(resolve_amount("Brake Service").as_paise(), 4999);
        assert_eq!(resolve_amount("Engine Diagnostic").as_paise(), 3999);
        assert_eq!(resolve_amount("Tire Rotation").as_paise(), 1999);
        assert_eq!(resolve_amount("Battery Replacement").as_paise(), 5999);
        assert_eq!(resolve_amount("AC Service").as_paise(), 3499);
        assert_eq!(resolve_amount("Full Service").as_paise(), 7999);
    }

    #[test]
    fn test_resolve_is_total_over_arbitrary_input() {
        assert_eq!(resolve_amount(""), DEFAULT_SERVICE_PRICE);
        assert_eq!(resolve_amount("oil change"), DEFAULT_SERVICE_PRICE);
        assert_eq!(resolve_amount("Underbody Wash"), DEFAULT_SERVICE_PRICE);
        assert_eq!(resolve_amount("🚗"), DEFAULT_SERVICE_PRICE);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(resolve_amount("AC Service").as_paise(), 3499);
        }
    }

    #[test]
    fn test_rupee_conversion() {
        let amount = Amount::from_paise(2999);
        assert_eq!(amount.as_rupees().to_string(), "29.99");
        assert_eq!(amount.to_string(), "₹29.99");
    }
}
