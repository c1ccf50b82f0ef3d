//! Salary amounts and raise rates with precise decimal arithmetic
//!
//! Salaries are stored by the database as `NUMERIC(18, 2)`, which rounds
//! half away from zero on assignment. The in-memory types round the same
//! way so an in-memory raise and a raise computed by an `UPDATE` statement
//! produce identical values.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of fractional digits kept for salary amounts
pub const SALARY_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur when constructing salary values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid raise rate: {0}")]
    InvalidRate(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A non-negative salary amount
///
/// # Example
///
/// ```rust
/// use core_kernel::{Salary, RaiseRate};
/// use rust_decimal_macros::dec;
///
/// let salary = Salary::new(dec!(1000.00)).unwrap();
/// assert_eq!(salary.raised_by(RaiseRate::default()).unwrap().amount(), dec!(1100.00));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Salary(Decimal);

impl Salary {
    /// Creates a salary, rounding to two decimal places
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the amount is negative
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "salary must be non-negative, got {}",
                amount
            )));
        }
        Ok(Self(round_to_store(amount)))
    }

    /// Creates a salary from an integer amount in cents
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), SALARY_DECIMAL_PLACES))
    }

    /// A zero salary
    pub fn zero() -> Self {
        Self(dec!(0.00))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Applies a raise rate and rounds the way the store does
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit a `Decimal`
    pub fn raised_by(&self, rate: RaiseRate) -> Result<Self, MoneyError> {
        let raised = self
            .0
            .checked_mul(rate.multiplier())
            .ok_or(MoneyError::Overflow)?;
        Ok(Self(round_to_store(raised)))
    }
}

impl TryFrom<Decimal> for Salary {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Salary> for Decimal {
    fn from(salary: Salary) -> Decimal {
        salary.0
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A strictly positive salary multiplier
///
/// `1.10` means a 10% raise. Rates below one are allowed (pay cuts) but a
/// rate of zero or less would break the non-negative salary invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct RaiseRate(Decimal);

impl RaiseRate {
    /// Creates a raise rate from a multiplier
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidRate` if the multiplier is zero or negative
    pub fn new(multiplier: Decimal) -> Result<Self, MoneyError> {
        if multiplier <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate(format!(
                "multiplier must be positive, got {}",
                multiplier
            )));
        }
        Ok(Self(multiplier.normalize()))
    }

    /// Creates a raise rate from a percentage increase (`10` becomes `1.10`)
    pub fn from_percent(percent: Decimal) -> Result<Self, MoneyError> {
        Self::new(Decimal::ONE + percent / dec!(100))
    }

    /// Returns the multiplier
    pub fn multiplier(&self) -> Decimal {
        self.0
    }
}

impl Default for RaiseRate {
    /// The standard 10% raise
    fn default() -> Self {
        Self(dec!(1.1))
    }
}

impl TryFrom<Decimal> for RaiseRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RaiseRate> for Decimal {
    fn from(rate: RaiseRate) -> Decimal {
        rate.0
    }
}

impl fmt::Display for RaiseRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

fn round_to_store(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(SALARY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SALARY_DECIMAL_PLACES);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_rejects_negative() {
        assert!(Salary::new(dec!(-0.01)).is_err());
        assert!(Salary::new(dec!(0)).is_ok());
    }

    #[test]
    fn test_raise_rounds_half_away_from_zero() {
        // 0.05 * 1.1 = 0.055
        let salary = Salary::new(dec!(0.05)).unwrap();
        let raised = salary.raised_by(RaiseRate::default()).unwrap();
        assert_eq!(raised.amount(), dec!(0.06));
    }

    #[test]
    fn test_rate_from_percent() {
        let rate = RaiseRate::from_percent(dec!(10)).unwrap();
        assert_eq!(rate, RaiseRate::default());
        assert_eq!(rate.multiplier(), dec!(1.1));
    }

    #[test]
    fn test_extreme_rate_overflows_without_panicking() {
        let rate = RaiseRate::new(Decimal::MAX).unwrap();
        assert_eq!(rate.to_string(), format!("x{}", Decimal::MAX));

        let result = Salary::new(dec!(2)).unwrap().raised_by(rate);
        assert!(matches!(result, Err(MoneyError::Overflow)));
    }

    #[test]
    fn test_rate_rejects_non_positive() {
        assert!(RaiseRate::new(dec!(0)).is_err());
        assert!(RaiseRate::from_percent(dec!(-100)).is_err());
    }
}
