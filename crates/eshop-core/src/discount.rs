//! # Discount Aggregation
//!
//! Combines every eligible coupon for an item into one adjusted unit price.
//!
//! ## Resolution Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Coupons Combine                                  │
//! │                                                                         │
//! │  Cumulative %        Non-cumulative %        Fixed amounts             │
//! │  ─────────────       ────────────────        ─────────────             │
//! │  30 + 40 = 70        max(15, 35) = 35        5.00 + 2.50 = 7.50        │
//! │       │                     │                       │                   │
//! │       ▼                     │                       │                   │
//! │  cap = largest              │                       │                   │
//! │  max_cumulative_%           │                       │                   │
//! │  min(70, 50) = 50           │                       │                   │
//! │       │                     │                       │                   │
//! │       └────► max(50, 35) ◄──┘                       │                   │
//! │                   │                                 │                   │
//! │                   ▼                                 ▼                   │
//! │      base × (1 - 50/100)           ──────────►  - 7.50                 │
//! │                                                                         │
//! │  Stacked and single-best percentages COMPETE, they never add up.       │
//! │  Fixed amounts always apply, uncapped.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is a sum or a max over the coupon list, so the result does not
//! depend on coupon order.
//!
//! ## Negative Prices
//! The result is not clamped at zero. Fixed amounts larger than the
//! discounted price produce a negative price and the caller decides.

use crate::money::Money;
use crate::types::Coupon;

/// The net adjustment produced by a set of coupons, before it meets a price.
///
/// ## Example
/// ```rust
/// use eshop_core::discount::DiscountRule;
/// use eshop_core::money::Money;
/// use eshop_core::types::Coupon;
///
/// let coupons = vec![
///     Coupon::for_product("IPhone X").with_percentage(20.0).cumulative(),
///     Coupon::for_product("IPhone X").with_percentage(35.0),
/// ];
///
/// let rule = DiscountRule::resolve(&coupons);
/// assert_eq!(rule.final_percentage, 35.0);
/// assert_eq!(rule.apply(Money::from_cents(10000)), Money::from_cents(6500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiscountRule {
    /// Sum of cumulative percentages after the cap.
    pub cumulative_percentage: f64,

    /// Largest non-cumulative percentage.
    pub best_non_cumulative: f64,

    /// Largest `max_cumulative_percentage` seen, 0 when none set.
    pub cumulative_cap: f64,

    /// The percentage actually applied.
    pub final_percentage: f64,

    /// Sum of all fixed amounts.
    pub fixed_amount: Money,
}

impl DiscountRule {
    /// Resolves a coupon list into a single rule.
    pub fn resolve(coupons: &[Coupon]) -> Self {
        let cumulative_cap = coupons
            .iter()
            .filter_map(|c| c.max_cumulative_percentage)
            .fold(0.0_f64, f64::max);

        let mut cumulative_percentage: f64 = coupons
            .iter()
            .filter(|c| c.is_cumulative)
            .filter_map(|c| c.percentage)
            .sum();

        let best_non_cumulative = coupons
            .iter()
            .filter(|c| !c.is_cumulative)
            .filter_map(|c| c.percentage)
            .fold(0.0_f64, f64::max);

        if cumulative_cap > 0.0 {
            cumulative_percentage = cumulative_percentage.min(cumulative_cap);
        }

        let fixed_amount: Money = coupons.iter().filter_map(|c| c.amount).sum();

        DiscountRule {
            cumulative_percentage,
            best_non_cumulative,
            cumulative_cap,
            final_percentage: cumulative_percentage.max(best_non_cumulative),
            fixed_amount,
        }
    }

    /// Applies the rule: `base × (1 - final% / 100) - fixed`.
    pub fn apply(&self, base_price: Money) -> Money {
        base_price.apply_percentage(self.final_percentage) - self.fixed_amount
    }
}

/// Computes the adjusted unit price for `base_price` under `coupons`.
///
/// `coupons` must already be filtered for eligibility (see
/// [`crate::eligibility`]). The function is pure: it never fails, never
/// mutates its input and always returns the same price for the same inputs.
///
/// ## Example
/// ```rust
/// use eshop_core::discount::aggregate;
/// use eshop_core::money::Money;
/// use eshop_core::types::Coupon;
///
/// let coupons = vec![
///     Coupon::for_product("IPhone X")
///         .with_percentage(30.0)
///         .cumulative()
///         .with_max_cumulative_percentage(50.0),
///     Coupon::for_product("IPhone X").with_percentage(40.0).cumulative(),
/// ];
///
/// // 30 + 40 = 70, capped to 50
/// assert_eq!(aggregate(Money::from_cents(10000), &coupons), Money::from_cents(5000));
/// ```
pub fn aggregate(base_price: Money, coupons: &[Coupon]) -> Money {
    DiscountRule::resolve(coupons).apply(base_price)
}

// =============================================================================
// Unit Tests
// =============================================================================
