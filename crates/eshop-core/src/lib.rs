//! # eshop-core: Pure Discount and Basket Logic
//!
//! This crate holds the discount rules of the shop as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        eShop Discount Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Basket / Checkout callers                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ gRPC (discount.v1)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 discount-grpc (tonic server)                    │   │
//! │  │      GetDiscount, CreateDiscount, UpdateDiscount, Delete...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ eshop-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discount  │  │  basket   │  │ validation│  │   │
//! │  │   │  Coupon   │  │ aggregate │  │ price_cart│  │   rules   │  │   │
//! │  │   │   Money   │  │eligibility│  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    eshop-db (Database Layer)                    │   │
//! │  │       SQLite coupon store, basket documents, migrations         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Coupon and CouponType
//! - [`money`] - Decimal money type
//! - [`discount`] - The discount aggregator
//! - [`eligibility`] - Which coupons apply to a product and code
//! - [`basket`] - Shopping cart types and the price updater
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use eshop_core::{aggregate, filter_eligible, Coupon, Money};
//!
//! let stored = vec![
//!     Coupon::for_product("IPhone X").with_percentage(10.0),
//!     Coupon::for_product("IPhone X")
//!         .with_amount(Money::from_cents(500))
//!         .with_code("SPRING"),
//! ];
//!
//! let eligible = filter_eligible(&stored, "IPhone X", Some("SPRING"));
//! let price = aggregate(Money::from_cents(10000), &eligible);
//!
//! // 100.00 - 10% - 5.00
//! assert_eq!(price, Money::from_cents(8500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod discount;
pub mod eligibility;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::{price_cart, price_item, ShoppingCart, ShoppingCartItem};
pub use discount::{aggregate, DiscountRule};
pub use eligibility::{filter_eligible, is_eligible};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single basket.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single basket line.
///
/// Catches typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest price or fixed amount accepted, in whole currency units.
///
/// Keeps sums of amounts and `unit_price × MAX_ITEM_QUANTITY × MAX_CART_ITEMS`
/// many orders of magnitude inside `Decimal` range.
pub const MAX_MONEY: i64 = 1_000_000_000;
