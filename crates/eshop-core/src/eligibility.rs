//! # Coupon Eligibility
//!
//! Narrows a product's coupons to the ones a customer may use.
//!
//! ## Rule
//! ```text
//! product_name matches exactly
//!   AND ( percentage is set
//!         OR ( code supplied AND type == Code AND coupon.code == code ) )
//! ```
//!
//! The store runs the same predicate in SQL; this module is the in-memory
//! reference used by tests and by callers that already hold the coupons.
//! Note that a Code coupon carrying a percentage passes through the first
//! branch even without a code. That is the observed store behavior.

use crate::types::{Coupon, CouponType};

/// Returns true when `coupon` applies to `product_name` given `code`.
///
/// ## Example
/// ```rust
/// use eshop_core::eligibility::is_eligible;
/// use eshop_core::money::Money;
/// use eshop_core::types::Coupon;
///
/// let coupon = Coupon::for_product("IPhone X")
///     .with_amount(Money::from_cents(500))
///     .with_code("SPRING");
///
/// assert!(is_eligible(&coupon, "IPhone X", Some("SPRING")));
/// assert!(!is_eligible(&coupon, "IPhone X", None));
/// ```
pub fn is_eligible(coupon: &Coupon, product_name: &str, code: Option<&str>) -> bool {
    if coupon.product_name != product_name {
        return false;
    }

    if coupon.percentage.is_some() {
        return true;
    }

    match code {
        Some(code) if !code.is_empty() => {
            coupon.coupon_type == CouponType::Code && coupon.code.as_deref() == Some(code)
        }
        _ => false,
    }
}

/// Filters `coupons` down to the ones eligible for `product_name` and `code`.
pub fn filter_eligible<'a, I>(coupons: I, product_name: &str, code: Option<&str>) -> Vec<Coupon>
where
    I: IntoIterator<Item = &'a Coupon>,
{
    coupons
        .into_iter()
        .filter(|c| is_eligible(c, product_name, code))
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_percentage_coupon_always_eligible() {
        let coupon = Coupon::for_product("IPhone X").with_percentage(10.0);
        assert!(is_eligible(&coupon, "IPhone X", None));
        assert!(is_eligible(&coupon, "IPhone X", Some("ANY")));
    }

    #[test]
    fn test_product_name_must_match_exactly() {
        let coupon = Coupon::for_product("IPhone X").with_percentage(10.0);
        assert!(!is_eligible(&coupon, "iphone x", None));
        assert!(!is_eligible(&coupon, "IPhone X ", None));
    }

    #[test]
    fn test_code_coupon_requires_matching_code() {
        let coupon = Coupon::for_product("IPhone X")
            .with_amount(Money::from_cents(500))
            .with_code("SPRING");

        assert!(is_eligible(&coupon, "IPhone X", Some("SPRING")));
        assert!(!is_eligible(&coupon, "IPhone X", Some("spring")));
        assert!(!is_eligible(&coupon, "IPhone X", Some("")));
        assert!(!is_eligible(&coupon, "IPhone X", None));
    }

    #[test]
    fn test_amount_only_percentage_type_needs_code_path() {
        // No percentage and not a Code coupon: never eligible
        let coupon = Coupon::for_product("IPhone X").with_amount(Money::from_cents(500));
        assert!(!is_eligible(&coupon, "IPhone X", None));
        assert!(!is_eligible(&coupon, "IPhone X", Some("SPRING")));
    }

    #[test]
    fn test_code_coupon_with_percentage_passes_without_code() {
        let coupon = Coupon::for_product("IPhone X")
            .with_percentage(15.0)
            .with_code("SPRING");
        assert!(is_eligible(&coupon, "IPhone X", None));
    }

    #[test]
    fn test_filter_eligible() {
        let coupons = vec![
            Coupon::for_product("IPhone X").with_percentage(10.0),
            Coupon::for_product("Samsung 10").with_percentage(20.0),
            Coupon::for_product("IPhone X")
                .with_amount(Money::from_cents(500))
                .with_code("SPRING"),
            Coupon::for_product("IPhone X"),
        ];

        assert_eq!(filter_eligible(&coupons, "IPhone X", None).len(), 1);
        assert_eq!(filter_eligible(&coupons, "IPhone X", Some("SPRING")).len(), 2);
        assert!(filter_eligible(&coupons, "Pixel", Some("SPRING")).is_empty());
    }
}
