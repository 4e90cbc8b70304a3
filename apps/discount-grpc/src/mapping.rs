//! Conversions between protobuf messages and domain types.
//!
//! Money crosses the wire as decimal strings; anything unparseable is a
//! validation error so the caller gets `InvalidArgument`.

use std::str::FromStr;

use eshop_core::validation::validate_money;
use eshop_core::{Coupon, CouponType, Money, ValidationError};

use crate::proto::{CouponModel, CouponType as ProtoCouponType};

impl From<Coupon> for CouponModel {
    fn from(coupon: Coupon) -> Self {
        let coupon_type = match coupon.coupon_type {
            CouponType::Percentage => ProtoCouponType::Percentage,
            CouponType::Code => ProtoCouponType::Code,
        };

        CouponModel {
            id: coupon.id,
            product_name: coupon.product_name,
            description: coupon.description,
            r#type: coupon_type as i32,
            code: coupon.code,
            percentage: coupon.percentage,
            amount: coupon.amount.map(|a| a.amount().to_string()),
            is_cumulative: coupon.is_cumulative,
            max_cumulative_percentage: coupon.max_cumulative_percentage,
            max_redemptions: coupon.max_redemptions,
        }
    }
}

impl TryFrom<CouponModel> for Coupon {
    type Error = ValidationError;

    fn try_from(model: CouponModel) -> Result<Self, Self::Error> {
        let amount = model
            .amount
            .as_deref()
            .map(|a| parse_money("amount", a))
            .transpose()?;

        Ok(Coupon {
            id: model.id,
            product_name: model.product_name,
            description: model.description,
            coupon_type: CouponType::from_i32(model.r#type),
            code: model.code,
            percentage: model.percentage,
            amount,
            is_cumulative: model.is_cumulative,
            max_cumulative_percentage: model.max_cumulative_percentage,
            max_redemptions: model.max_redemptions,
        })
    }
}

/// Parses a decimal string, reporting failures against `field`.
pub fn parse_money(field: &str, value: &str) -> Result<Money, ValidationError> {
    Money::from_str(value).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a decimal number", value),
    })
}

/// Parses the optional `base_price` of a GetDiscount request.
///
/// Must be a decimal string greater than zero and no larger than
/// [`eshop_core::MAX_MONEY`].
pub fn parse_base_price(value: &str) -> Result<Money, ValidationError> {
    let price = parse_money("base_price", value)?;

    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "base_price".to_string(),
        });
    }

    validate_money("base_price", price)?;
    Ok(price)
}
