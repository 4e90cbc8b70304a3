//! # Development Seed Data
//!
//! A spread of coupon shapes for trying the service by hand. Used by the
//! `seed` binary and by the server when `seed_on_startup` is set.
//!
//! ## Generated Coupons
//! For every product in [`PRODUCTS`]:
//! - one automatic percentage coupon
//! - two cumulative coupons, one carrying a cap
//! - one code-only fixed amount coupon (`WELCOME`)
//!
//! Phones also get a 30% non-cumulative Code coupon tagged `VIP`. It carries
//! a percentage, so it applies with or without the code and beats the
//! capped stack.

use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use eshop_core::validation::validate_coupon;
use eshop_core::{Coupon, Money};

/// Products to attach coupons to: (name, is_phone)
pub const PRODUCTS: &[(&str, bool)] = &[
    ("IPhone X", true),
    ("Samsung 10", true),
    ("Huawei Plus", true),
    ("Xiaomi Mi 9", true),
    ("HTC U11+ Plus", true),
    ("LG G7 ThinQ", true),
    ("Panasonic Lumix", false),
    ("Nikon D750", false),
];

/// Rows created by the first migration.
pub const BASE_ROWS: i64 = 2;

/// Builds the full development coupon set.
pub fn development_coupons() -> Vec<Coupon> {
    PRODUCTS
        .iter()
        .enumerate()
        .flat_map(|(index, (product, is_phone))| coupons_for(product, *is_phone, index))
        .collect()
}

/// Inserts [`development_coupons`] unless the store already holds more than
/// the base rows.
///
/// ## Returns
/// * `Ok(Some(n))` - `n` coupons inserted
/// * `Ok(None)` - Store already seeded, nothing written
pub async fn seed_development_data(db: &Database) -> DbResult<Option<usize>> {
    let existing = db.coupons().count().await?;
    if existing > BASE_ROWS {
        info!(existing, "Coupon store already seeded, skipping");
        return Ok(None);
    }

    let mut inserted = 0;
    for coupon in development_coupons() {
        if let Err(e) = validate_coupon(&coupon) {
            warn!(product_name = %coupon.product_name, error = %e, "Skipping invalid seed coupon");
            continue;
        }

        db.coupons().insert(&coupon).await?;
        inserted += 1;
    }

    info!(inserted, "Development coupons seeded");
    Ok(Some(inserted))
}

/// Builds the coupon set for one product.
///
/// Percentages vary with `index` so products don't all price alike.
fn coupons_for(product: &str, is_phone: bool, index: usize) -> Vec<Coupon> {
    let step = (index % 4) as f64 * 5.0;

    let mut coupons = vec![
        Coupon::for_product(product)
            .with_percentage(5.0 + step)
            .with_description(format!("{} seasonal discount", product)),
        Coupon::for_product(product)
            .with_percentage(10.0)
            .cumulative()
            .with_max_cumulative_percentage(25.0)
            .with_description("Loyalty stack (capped at 25%)"),
        Coupon::for_product(product)
            .with_percentage(10.0 + step)
            .cumulative()
            .with_description("Bundle stack"),
        Coupon::for_product(product)
            .with_amount(Money::from_cents(1000 + (index as i64) * 250))
            .with_code("WELCOME")
            .with_description("Welcome voucher"),
    ];

    if is_phone {
        coupons.push(
            Coupon::for_product(product)
                .with_percentage(30.0)
                .with_code("VIP")
                .with_description("VIP phone offer"),
        );
    }

    coupons
}
