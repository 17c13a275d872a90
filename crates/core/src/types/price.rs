//! Type-safe price representation using decimal arithmetic.
//!
//! The backend transmits prices as JSON numbers; on the wire they pass
//! through `rust_decimal`'s float serde so amounts like `100.0` parse
//! losslessly into [`Decimal`] instead of drifting through `f64` math.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices must be zero or positive.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input string is not a decimal number.
    #[error("not a valid price: {0}")]
    Malformed(String),
}

/// A non-negative monetary amount.
///
/// The shop runs in a single currency, so a price is just a validated
/// decimal. Construction through [`Price::new`] is the only place the
/// non-negativity invariant is checked; arithmetic on already-valid
/// prices cannot produce a negative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount < 0`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `qty` units at this price.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0 * Decimal::from(qty))
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| PriceError::Malformed(s.to_owned()))?;
        Self::new(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            Price::new(dec!(-0.01)),
            Err(PriceError::Negative(dec!(-0.01)))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(dec!(19.99)).is_ok());
    }

    #[test]
    fn test_line_total() {
        let price = Price::new(dec!(100)).expect("valid price");
        assert_eq!(price.times(2).amount(), dec!(200));
        assert_eq!(price.times(0).amount(), Decimal::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [dec!(100), dec!(50), dec!(0.50)]
            .into_iter()
            .map(|d| Price::new(d).expect("valid price"))
            .sum();
        assert_eq!(total.amount(), dec!(150.50));
    }

    #[test]
    fn test_parse() {
        assert_eq!("12.50".parse::<Price>().map(|p| p.amount()), Ok(dec!(12.50)));
        assert_eq!(
            "-3".parse::<Price>(),
            Err(PriceError::Negative(dec!(-3)))
        );
        assert!(matches!(
            "cheap".parse::<Price>(),
            Err(PriceError::Malformed(_))
        ));
    }

    #[test]
    fn test_wire_format_is_a_number() {
        let price = Price::new(dec!(100)).expect("valid price");
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "100.0");

        let parsed: Price = serde_json::from_str("249.99").expect("deserialize");
        assert_eq!(parsed.amount(), dec!(249.99));
    }
}
