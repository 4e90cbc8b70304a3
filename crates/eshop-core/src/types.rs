//! # Domain Types
//!
//! Coupon types shared by the aggregator, the store and the gRPC layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Coupon Model                                    │
//! │                                                                         │
//! │  ┌───────────────────────────────┐   ┌─────────────────┐               │
//! │  │           Coupon              │   │   CouponType    │               │
//! │  │  ───────────────────────────  │   │  ─────────────  │               │
//! │  │  id, product_name (lookup)    │   │  Percentage (0) │ auto-applied  │
//! │  │  coupon_type, code            │   │  Code       (1) │ needs code    │
//! │  │  percentage: Option<f64>      │   └─────────────────┘               │
//! │  │  amount: Option<Money>        │                                      │
//! │  │  is_cumulative                │                                      │
//! │  │  max_cumulative_percentage    │                                      │
//! │  │  max_redemptions (unused)     │                                      │
//! │  └───────────────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Optional Numbers
//! `percentage`, `amount` and `max_cumulative_percentage` are `Option`s.
//! `Some(0.0)` is a real "0% rule", `None` means the coupon has no such rule.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Coupon Type
// =============================================================================

/// How a coupon becomes eligible.
///
/// Stored as INTEGER (`0` / `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CouponType {
    /// Applied automatically to every matching product.
    #[default]
    Percentage = 0,
    /// Applied only when the customer supplies the matching code.
    Code = 1,
}

impl CouponType {
    /// Maps a wire/database integer back to a coupon type.
    ///
    /// Unknown values fall back to `Percentage`, the original default.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => CouponType::Code,
            _ => CouponType::Percentage,
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount rule attached to a product name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coupon {
    /// Store-assigned identifier (0 before insert).
    pub id: i64,

    /// Product this coupon applies to. Not unique.
    pub product_name: String,

    /// Free-text description shown in admin tools.
    pub description: String,

    /// Whether a code is needed.
    #[serde(rename = "type")]
    pub coupon_type: CouponType,

    /// Code the customer must enter (Code coupons only).
    pub code: Option<String>,

    /// Percentage discount in [0, 100].
    pub percentage: Option<f64>,

    /// Fixed currency discount.
    pub amount: Option<Money>,

    /// Stacks with other cumulative coupons when true.
    pub is_cumulative: bool,

    /// Cap on the summed cumulative percentage. The largest cap wins.
    pub max_cumulative_percentage: Option<f64>,

    /// Declared redemption limit. Not enforced anywhere.
    pub max_redemptions: Option<i32>,
}

impl Coupon {
    /// Creates an empty automatic coupon for a product.
    pub fn for_product(product_name: impl Into<String>) -> Self {
        Coupon {
            product_name: product_name.into(),
            ..Coupon::default()
        }
    }

    /// Sets the admin-facing description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets a percentage rule.
    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    /// Sets a fixed amount rule.
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Marks the coupon cumulative.
    pub fn cumulative(mut self) -> Self {
        self.is_cumulative = true;
        self
    }

    /// Sets the cumulative cap.
    pub fn with_max_cumulative_percentage(mut self, cap: f64) -> Self {
        self.max_cumulative_percentage = Some(cap);
        self
    }

    /// Turns this into a Code coupon requiring `code`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.coupon_type = CouponType::Code;
        self.code = Some(code.into());
        self
    }

    /// True when the coupon carries neither a percentage nor an amount.
    ///
    /// Such coupons are legal and simply contribute nothing.
    pub fn is_empty_rule(&self) -> bool {
        self.percentage.is_none() && self.amount.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
