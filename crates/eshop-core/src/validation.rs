//! # Validation Module
//!
//! Input validation for coupons and baskets.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: gRPC request (prost)                                         │
//! │  └── Type validation (decoding, decimal strings parsed)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Coupon rules (ranges, code required for Code coupons)             │
//! │  └── Basket rules (user name, quantity, product id)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The aggregator never validates; it trusts what the store hands it.

use rust_decimal::Decimal;

use crate::basket::{ShoppingCart, ShoppingCartItem};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Coupon, CouponType};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_MONEY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name (the coupon lookup key).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use eshop_core::validation::validate_product_name;
///
/// assert!(validate_product_name("IPhone X").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product_name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "product_name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates the basket owner.
pub fn validate_user_name(user_name: &str) -> ValidationResult<()> {
    if user_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "user_name".to_string(),
        });
    }

    Ok(())
}

/// Validates a product id (must be a UUID).
///
/// ## Example
/// ```rust
/// use eshop_core::validation::validate_product_id;
///
/// assert!(validate_product_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_product_id("not-a-uuid").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "product_id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage field: finite and within [0, 100].
fn validate_percentage(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a price or fixed amount.
///
/// ## Rules
/// - Must not be negative (zero allowed)
/// - Must not exceed MAX_MONEY
pub fn validate_money(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if value.amount() > Decimal::from(MAX_MONEY) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: MAX_MONEY as f64,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: MAX_ITEM_QUANTITY as f64,
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a coupon before it is stored.
///
/// ## Rules
/// ```text
/// product_name               required, ≤ 200 chars
/// percentage                 finite, 0..=100           (if set)
/// max_cumulative_percentage  finite, 0..=100           (if set)
/// amount                     ≥ 0                       (if set)
/// type = Code                non-empty code required
/// max_redemptions            ≥ 0                       (if set)
/// ```
///
/// A coupon with neither percentage nor amount is valid; it just
/// contributes nothing.
pub fn validate_coupon(coupon: &Coupon) -> ValidationResult<()> {
    validate_product_name(&coupon.product_name)?;

    if let Some(percentage) = coupon.percentage {
        validate_percentage("percentage", percentage)?;
    }

    if let Some(cap) = coupon.max_cumulative_percentage {
        validate_percentage("max_cumulative_percentage", cap)?;
    }

    if let Some(amount) = coupon.amount {
        validate_money("amount", amount)?;
    }

    if coupon.coupon_type == CouponType::Code
        && coupon.code.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if let Some(max) = coupon.max_redemptions {
        if max < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "max_redemptions".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates one basket line.
pub fn validate_cart_item(item: &ShoppingCartItem) -> ValidationResult<()> {
    validate_product_id(&item.product_id)?;
    validate_product_name(&item.product_name)?;
    validate_quantity(item.quantity)?;
    validate_money("unit_price", item.unit_price)?;
    Ok(())
}

/// Validates a whole basket.
pub fn validate_cart(cart: &ShoppingCart) -> ValidationResult<()> {
    validate_user_name(&cart.user_name)?;

    if cart.items.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0.0,
            max: MAX_CART_ITEMS as f64,
        });
    }

    cart.items.iter().try_for_each(validate_cart_item)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("IPhone X").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id(PRODUCT_ID).is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("123").is_err());
    }

    #[test]
    fn test_valid_coupons() {
        assert!(validate_coupon(&Coupon::for_product("IPhone X")).is_ok());
        assert!(validate_coupon(&Coupon::for_product("IPhone X").with_percentage(0.0)).is_ok());
        assert!(validate_coupon(&Coupon::for_product("IPhone X").with_percentage(100.0)).is_ok());
        assert!(validate_coupon(
            &Coupon::for_product("IPhone X")
                .with_amount(Money::from_cents(500))
                .with_code("SPRING")
        )
        .is_ok());
    }

    #[test]
    fn test_percentage_out_of_range() {
        let err = validate_coupon(&Coupon::for_product("A").with_percentage(100.5)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "percentage"));

        assert!(validate_coupon(&Coupon::for_product("A").with_percentage(-1.0)).is_err());
        assert!(validate_coupon(&Coupon::for_product("A").with_percentage(f64::NAN)).is_err());
        assert!(validate_coupon(&Coupon::for_product("A").with_max_cumulative_percentage(150.0)).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let coupon = Coupon::for_product("A").with_amount(Money::from_cents(-1));
        assert!(matches!(
            validate_coupon(&coupon),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_amount_upper_bound() {
        let at_limit = Money::new(Decimal::from(MAX_MONEY));
        assert!(validate_coupon(&Coupon::for_product("A").with_amount(at_limit)).is_ok());

        let above = at_limit + Money::from_cents(1);
        assert!(matches!(
            validate_coupon(&Coupon::for_product("A").with_amount(above)),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "amount"
        ));

        let huge: Money = "50000000000000000000000000000".parse().unwrap();
        assert!(validate_coupon(&Coupon::for_product("A").with_amount(huge).with_code("X")).is_err());
    }

    #[test]
    fn test_unit_price_upper_bound() {
        let huge: Money = "100000000000000000000000000".parse().unwrap();
        let item = ShoppingCartItem::new(PRODUCT_ID, "IPhone X", huge, 1);
        assert!(matches!(
            validate_cart_item(&item),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "unit_price"
        ));

        let at_limit = ShoppingCartItem::new(
            PRODUCT_ID,
            "IPhone X",
            Money::new(Decimal::from(MAX_MONEY)),
            MAX_ITEM_QUANTITY,
        );
        assert!(validate_cart_item(&at_limit).is_ok());
    }

    #[test]
    fn test_code_coupon_requires_code() {
        let coupon = Coupon {
            coupon_type: CouponType::Code,
            ..Coupon::for_product("A")
        };
        assert!(matches!(
            validate_coupon(&coupon),
            Err(ValidationError::Required { ref field }) if field == "code"
        ));

        let blank = Coupon::for_product("A").with_code("  ");
        assert!(validate_coupon(&blank).is_err());
    }

    #[test]
    fn test_negative_max_redemptions_rejected() {
        let coupon = Coupon {
            max_redemptions: Some(-3),
            ..Coupon::for_product("A")
        };
        assert!(validate_coupon(&coupon).is_err());
    }

    #[test]
    fn test_validate_cart() {
        let item = ShoppingCartItem::new(PRODUCT_ID, "IPhone X", Money::from_cents(100), 1);
        assert!(validate_cart(&ShoppingCart::new("swn").with_item(item.clone())).is_ok());
        assert!(validate_cart(&ShoppingCart::new("").with_item(item.clone())).is_err());

        let zero_qty = ShoppingCartItem { quantity: 0, ..item.clone() };
        assert!(validate_cart(&ShoppingCart::new("swn").with_item(zero_qty)).is_err());

        let bad_id = ShoppingCartItem::new("abc", "IPhone X", Money::from_cents(100), 1);
        assert!(validate_cart(&ShoppingCart::new("swn").with_item(bad_id)).is_err());
    }
}
