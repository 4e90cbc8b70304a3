//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Stacking discounts in f64:                                            │
//! │    99.99 × 0.85 - 5.00 = 79.99149999999999  → drifts per item          │
//! │                                                                         │
//! │  OUR SOLUTION: 96-bit Decimal                                           │
//! │    99.99 × 0.85 - 5.00 = 79.9915 exactly                               │
//! │    Percent math may use f64, the final price never does               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eshop_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price.multiply_quantity(2);
//! assert_eq!(doubled, Money::from_cents(2198));
//! ```
//!
//! ## Overflow
//! `Decimal` tops out near 7.9e28. Every operation here saturates at that
//! bound instead of panicking, so pricing stays total. Validation keeps real
//! inputs far below it (see [`crate::MAX_MONEY`]).

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact decimal.
///
/// ## Design Decisions
/// - **Signed**: a fixed-amount discount larger than the discounted price
///   yields a negative value, and callers decide what to do with it
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serde**: serialized as a string (`"19.99"`) so JSON never loses digits
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Catalog price ──► ShoppingCartItem.unit_price                          │
/// │                          │                                              │
/// │                          ▼                                              │
/// │              aggregate(unit_price, coupons)                             │
/// │                          │                                              │
/// │                          ▼                                              │
/// │  ShoppingCartItem.price ──► ShoppingCart.total_price()                  │
/// │                                                                         │
/// │  Coupon.amount (fixed discount) is Money too                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an existing decimal value.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use eshop_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity, saturating at the decimal bounds.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Scales the value by `(1 - percentage / 100)`.
    ///
    /// The percentage arrives as `f64` (coupon rates are stored as REAL and
    /// compared in floating point), but it is converted to `Decimal` before
    /// it touches the price. A non-finite percentage leaves the value as is.
    ///
    /// ## Example
    /// ```rust
    /// use eshop_core::money::Money;
    ///
    /// let price = Money::from_cents(10000); // $100.00
    /// assert_eq!(price.apply_percentage(35.0), Money::from_cents(6500));
    /// ```
    pub fn apply_percentage(&self, percentage: f64) -> Money {
        let rate = Decimal::from_f64(percentage).unwrap_or(Decimal::ZERO);
        let multiplier = Decimal::ONE.saturating_sub(rate / Decimal::ONE_HUNDRED);
        Money(self.0.saturating_mul(multiplier))
    }

    /// Rounds to cents using Bankers Rounding (round half to even).
    ///
    /// Only for presentation; discount results are kept exact.
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money rounded to cents, e.g. `$10.99` or `-$5.50`.
///
/// ## Note
/// This is for logs and debugging. Clients format prices themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let mut abs = rounded.abs();
        abs.rescale(2);
        write!(f, "{}${}", sign, abs)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Parses a plain decimal string such as `"19.99"` (wire format for prices).
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), Decimal::new(1099, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_to_even() {
        let money: Money = "2.125".parse().unwrap();
        assert_eq!(money.to_string(), "$2.12");
        let money: Money = "2.135".parse().unwrap();
        assert_eq!(money.to_string(), "$2.14");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a.multiply_quantity(3), Money::from_cents(3000));
        assert_eq!((b - a), Money::from_cents(-500));
    }

    #[test]
    fn test_apply_percentage() {
        let price = Money::from_cents(10000);
        assert_eq!(price.apply_percentage(10.0), Money::from_cents(9000));
        assert_eq!(price.apply_percentage(0.0), price);
        assert_eq!(price.apply_percentage(100.0), Money::zero());
    }

    #[test]
    fn test_apply_non_finite_percentage_is_noop() {
        let price = Money::from_cents(10000);
        assert_eq!(price.apply_percentage(f64::NAN), price);
    }

    #[test]
    fn test_parse() {
        let money: Money = " 19.99 ".parse().unwrap();
        assert_eq!(money, Money::from_cents(1999));
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(350));
    }

    #[test]
    fn test_decimal_avoids_float_drift() {
        let price = Money::from_cents(9999);
        let result = price.apply_percentage(15.0) - Money::from_cents(500);
        assert_eq!(result, "79.9915".parse().unwrap());
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let max = Money::new(Decimal::MAX);
        let min = Money::new(Decimal::MIN);

        assert_eq!(max + max, max);
        assert_eq!(min - max, min);
        assert_eq!(max.multiply_quantity(999), max);
        assert_eq!(max.multiply_quantity(-2), min);

        let total: Money = [max, max, Money::from_cents(1)].into_iter().sum();
        assert_eq!(total, max);

        let mut running = max;
        running += max;
        assert_eq!(running, max);
        running -= max;
        assert!(running.is_zero());
    }

    #[test]
    fn test_apply_percentage_at_decimal_bounds() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.apply_percentage(0.0), max);
        assert_eq!(max.apply_percentage(100.0), Money::zero());
        assert!(max.apply_percentage(-1e30).is_positive());
    }
}
