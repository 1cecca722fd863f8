//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    96-bit mantissa + explicit scale, base 10                            │
//! │    "15.00" + "25.00" = "40.00" exactly, scale preserved                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ventas_core::money::Money;
//!
//! let price: Money = "19.99".parse().unwrap();
//! let total = price + "0.01".parse().unwrap();
//! assert_eq!(total.to_string(), "20.00");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount with exact decimal arithmetic.
///
/// ## Design Decisions
/// - **Decimal, not cents**: catalog prices arrive with arbitrary scale and
///   totals must keep it ("40.00", not "40")
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Serde transparent**: serialized as a decimal string, so no precision
///   is lost in JSON
///
/// Equality is numeric: `40` and `40.00` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use ventas_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.to_string(), "0");
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display prints the plain decimal with its scale (e.g. `40.00`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|e| ValidationError::invalid_format("price", e.to_string()))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Panics on `Decimal` overflow. Catalog prices are capped at
/// [`crate::MAX_UNIT_PRICE`], so sale totals stay well inside the range.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_display_keep_scale() {
        let money: Money = "19.99".parse().unwrap();
        assert_eq!(money.amount(), dec!(19.99));
        assert_eq!(money.to_string(), "19.99");

        let money: Money = " 15.00 ".parse().unwrap();
        assert_eq!(money.to_string(), "15.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_addition_is_exact() {
        let a = Money::new(dec!(0.1));
        let b = Money::new(dec!(0.2));
        assert_eq!(a + b, Money::new(dec!(0.3)));

        let mut total = Money::new(dec!(15.00));
        total += Money::new(dec!(25.00));
        assert_eq!(total.to_string(), "40.00");
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_numeric_equality_ignores_scale() {
        assert_eq!(Money::new(dec!(40)), Money::new(dec!(40.00)));
    }

    #[test]
    fn test_negative_checks() {
        assert!(Money::new(dec!(-0.01)).is_negative());
        assert!(!Money::zero().is_negative());
        assert!(!Money::new(dec!(1)).is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(40.00))).unwrap();
        assert_eq!(json, "\"40.00\"");
    }
}
