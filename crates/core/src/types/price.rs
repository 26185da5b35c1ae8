//! Non-negative unit prices using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rejected price amounts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A unit price in the shop's currency.
///
/// Serialized as a decimal string (`"45.99"`) so no precision is lost in
/// JSON; numeric JSON values are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times() {
        let price = Price::new(Decimal::new(4599, 2)).unwrap();
        assert_eq!(price.times(3), Decimal::new(13797, 2));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_display_two_places() {
        let price = Price::new(Decimal::new(120, 0)).unwrap();
        assert_eq!(price.to_string(), "$120.00");
    }

    #[test]
    fn test_serde_string_and_number() {
        let price = Price::new(Decimal::new(3599, 2)).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"35.99\"");
        let from_str: Price = serde_json::from_str("\"35.99\"").unwrap();
        let from_num: Price = serde_json::from_str("35.99").unwrap();
        assert_eq!(from_str, price);
        assert_eq!(from_num, price);
        assert!(serde_json::from_str::<Price>("\"-2\"").is_err());
    }
}
