//! Money value object.
//!
//! Amounts are held in minor units (pence/cents) so that aggregation is exact.
//! A `Money` value lies in `0..=MAX_AMOUNT_CENTS`: construction and
//! deserialization both reject anything outside that range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use super::ValidationError;

/// Largest single amount accepted (100 million in major units).
///
/// Keeps every booking total far below `i64::MAX`, so aggregation is exact.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// A non-negative monetary amount in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units, rejecting negative or oversized values.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        Self::for_field("amount", cents)
    }

    /// Like [`Money::from_cents`] but names the offending field in the error.
    pub fn for_field(field: &str, cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::negative_amount(field, cents));
        }
        if cents > MAX_AMOUNT_CENTS {
            return Err(ValidationError::amount_too_large(field, MAX_AMOUNT_CENTS, cents));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in minor units.
    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// Operands are bounded by MAX_AMOUNT_CENTS; saturation only guards against wrap.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl TryFrom<i64> for Money {
    type Error = ValidationError;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        Money::from_cents(cents)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> i64 {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_accepts_zero_and_positive() {
        assert_eq!(Money::from_cents(0).unwrap(), Money::ZERO);
        assert_eq!(Money::from_cents(1999).unwrap().cents(), 1999);
    }

    #[test]
    fn from_cents_rejects_negative() {
        let err = Money::for_field("labour_cost", -1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'labour_cost' must not be negative, got -1"
        );
    }

    #[test]
    fn from_cents_rejects_amounts_over_limit() {
        assert_eq!(
            Money::from_cents(MAX_AMOUNT_CENTS).unwrap().cents(),
            MAX_AMOUNT_CENTS
        );
        let err = Money::for_field("labour_cost", i64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge { .. }));
        assert_eq!(err.field(), "labour_cost");
    }

    #[test]
    fn deserializing_oversized_amount_fails() {
        assert!(serde_json::from_str::<Money>(&i64::MAX.to_string()).is_err());
    }

    #[test]
    fn sum_adds_all_amounts() {
        let total: Money = [100, 250, 5]
            .into_iter()
            .map(|c| Money::from_cents(c).unwrap())
            .sum();
        assert_eq!(total.cents(), 355);
    }

    #[test]
    fn deserializing_negative_amount_fails() {
        assert!(serde_json::from_str::<Money>("-50").is_err());
        assert_eq!(serde_json::from_str::<Money>("50").unwrap().cents(), 50);
    }

    #[test]
    fn display_formats_major_and_minor_units() {
        assert_eq!(Money::from_cents(30005).unwrap().to_string(), "300.05");
    }
}
