//! # Basket Pricing
//!
//! Shopping cart types and the pure price updater that feeds each item
//! through the discount aggregator.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Pricing                                       │
//! │                                                                         │
//! │  ShoppingCart { coupon_code: "SPRING", items }                         │
//! │       │                                                                 │
//! │       │  for each item (independent, any order)                        │
//! │       ▼                                                                 │
//! │  coupons_by_product["IPhone X"] ──► aggregate(unit_price, coupons)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NEW ShoppingCartItem { unit_price (unchanged), price (discounted) }   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NEW ShoppingCart ──► stored by the caller                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Two Prices?
//! `unit_price` is the catalog price and never changes once the item is in
//! the cart. `price` is derived from it on every repricing, so pricing a
//! basket twice yields the same result and discounts never compound.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::discount::aggregate;
use crate::money::Money;
use crate::types::Coupon;

// =============================================================================
// Shopping Cart Item
// =============================================================================

/// A line in a shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartItem {
    /// Catalog product id (UUID).
    pub product_id: String,

    /// Product name; the coupon lookup key.
    pub product_name: String,

    /// Selected color variant.
    #[serde(default)]
    pub color: String,

    /// Number of units.
    pub quantity: i64,

    /// Catalog unit price before discounts.
    pub unit_price: Money,

    /// Discounted unit price.
    pub price: Money,
}

impl ShoppingCartItem {
    /// Creates an undiscounted item.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        ShoppingCartItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            color: String::new(),
            quantity,
            unit_price,
            price: unit_price,
        }
    }

    /// Sets the color variant.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Discounted price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Shopping Cart
// =============================================================================

/// A user's basket, stored as one document keyed by user name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    /// Owner; also the document key.
    pub user_name: String,

    /// Promo code entered by the customer, used for Code coupons.
    #[serde(default)]
    pub coupon_code: Option<String>,

    /// Lines in insertion order.
    #[serde(default)]
    pub items: Vec<ShoppingCartItem>,
}

impl ShoppingCart {
    /// Creates an empty cart.
    pub fn new(user_name: impl Into<String>) -> Self {
        ShoppingCart {
            user_name: user_name.into(),
            coupon_code: None,
            items: Vec::new(),
        }
    }

    /// Sets the promo code.
    pub fn with_coupon_code(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// Appends an item.
    pub fn with_item(mut self, item: ShoppingCartItem) -> Self {
        self.items.push(item);
        self
    }

    /// Promo code as `&str`, `None` when absent.
    pub fn code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Sum of discounted line totals.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(ShoppingCartItem::line_total).sum()
    }

    /// Distinct product names, in first-seen order.
    ///
    /// The store is queried once per name rather than once per line.
    pub fn product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for item in &self.items {
            if !names.contains(&item.product_name) {
                names.push(item.product_name.clone());
            }
        }
        names
    }

    /// Finds an item by product id.
    pub fn item(&self, product_id: &str) -> Option<&ShoppingCartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Price Updater
// =============================================================================

/// Returns a copy of `item` priced under `coupons`.
///
/// ## Example
/// ```rust
/// use eshop_core::basket::{price_item, ShoppingCartItem};
/// use eshop_core::money::Money;
/// use eshop_core::types::Coupon;
///
/// let item = ShoppingCartItem::new("p-1", "IPhone X", Money::from_cents(10000), 2);
/// let priced = price_item(&item, &[Coupon::for_product("IPhone X").with_percentage(10.0)]);
///
/// assert_eq!(priced.price, Money::from_cents(9000));
/// assert_eq!(priced.unit_price, item.unit_price);
/// ```
pub fn price_item(item: &ShoppingCartItem, coupons: &[Coupon]) -> ShoppingCartItem {
    ShoppingCartItem {
        price: aggregate(item.unit_price, coupons),
        ..item.clone()
    }
}

/// Returns a copy of `cart` with every item priced.
///
/// Products missing from `coupons_by_product` are priced with no coupons.
pub fn price_cart(
    cart: &ShoppingCart,
    coupons_by_product: &HashMap<String, Vec<Coupon>>,
) -> ShoppingCart {
    let items = cart
        .items
        .iter()
        .map(|item| {
            let coupons = coupons_by_product
                .get(&item.product_name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            price_item(item, coupons)
        })
        .collect();

    ShoppingCart {
        items,
        ..cart.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
