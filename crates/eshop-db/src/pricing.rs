//! # Basket Pricing Workflow
//!
//! Keeps stored baskets priced against the current coupons.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Basket Write                                   │
//! │                                                                         │
//! │  add_item / update_item_quantity / remove_item / create_basket         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_cart ──► Err(Validation) stops here, nothing stored          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each distinct product name:                                       │
//! │      coupons.find_applicable(name, cart.coupon_code)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_cart(cart, coupons_by_product)   (pure, from unit_price)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  baskets.upsert(priced) ──► priced basket returned to caller           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads return the stored document as-is.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::basket::BasketRepository;
use crate::repository::coupon::CouponRepository;
use eshop_core::validation::{validate_cart, validate_quantity, validate_user_name};
use eshop_core::{
    price_cart, CoreError, Coupon, ShoppingCart, ShoppingCartItem, ValidationError,
    MAX_ITEM_QUANTITY,
};

/// Basket operations that reprice on every write.
///
/// ## Usage
/// ```rust,ignore
/// let service = db.basket_service();
///
/// let cart = service.add_item("swn", item).await?;
/// println!("Total: {}", cart.total_price());
/// ```
#[derive(Debug, Clone)]
pub struct BasketService {
    coupons: CouponRepository,
    baskets: BasketRepository,
}

impl BasketService {
    /// Creates a new BasketService.
    pub fn new(coupons: CouponRepository, baskets: BasketRepository) -> Self {
        BasketService { coupons, baskets }
    }

    /// Stores `cart` for its user, replacing any existing basket.
    pub async fn create_basket(&self, cart: ShoppingCart) -> DbResult<ShoppingCart> {
        info!(user_name = %cart.user_name, items = cart.items.len(), "Creating basket");
        self.store(cart).await
    }

    /// Loads a user's basket.
    ///
    /// ## Errors
    /// * `CoreError::BasketNotFound` - User has no basket
    pub async fn get_basket(&self, user_name: &str) -> DbResult<ShoppingCart> {
        validate_user_name(user_name)?;

        let cart = self
            .baskets
            .get(user_name)
            .await?
            .ok_or_else(|| CoreError::BasketNotFound(user_name.to_string()))?;

        Ok(cart)
    }

    /// Adds an item, creating the basket if needed.
    ///
    /// An item with the same product id and color is merged by adding the
    /// quantities; the result must still be within the quantity limit.
    pub async fn add_item(&self, user_name: &str, item: ShoppingCartItem) -> DbResult<ShoppingCart> {
        validate_user_name(user_name)?;
        validate_quantity(item.quantity)?;

        let mut cart = self
            .baskets
            .get(user_name)
            .await?
            .unwrap_or_else(|| ShoppingCart::new(user_name));

        let existing = cart
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id && i.color == item.color);

        match existing {
            Some(line) => {
                debug!(product_id = %item.product_id, "Merging basket line");
                line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                    ValidationError::OutOfRange {
                        field: "quantity".to_string(),
                        min: 1.0,
                        max: MAX_ITEM_QUANTITY as f64,
                    }
                })?;
            }
            None => cart.items.push(item),
        }

        self.store(cart).await
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Errors
    /// * `Validation` - Quantity is 0, negative or above the limit
    /// * `BasketNotFound` / `ItemNotInBasket`
    pub async fn update_item_quantity(
        &self,
        user_name: &str,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<ShoppingCart> {
        validate_quantity(quantity)?;

        let mut cart = self.get_basket(user_name).await?;

        let line = cart
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| item_not_in_basket(user_name, product_id))?;
        line.quantity = quantity;

        self.store(cart).await
    }

    /// Removes every line for a product.
    pub async fn remove_item(&self, user_name: &str, product_id: &str) -> DbResult<ShoppingCart> {
        let mut cart = self.get_basket(user_name).await?;

        let before = cart.items.len();
        cart.items.retain(|i| i.product_id != product_id);

        if cart.items.len() == before {
            return Err(item_not_in_basket(user_name, product_id).into());
        }

        self.store(cart).await
    }

    /// Deletes a user's basket.
    pub async fn delete_basket(&self, user_name: &str) -> DbResult<()> {
        validate_user_name(user_name)?;

        if !self.baskets.delete(user_name).await? {
            return Err(CoreError::BasketNotFound(user_name.to_string()).into());
        }

        info!(user_name = %user_name, "Basket deleted");
        Ok(())
    }

    /// Validates, reprices and writes a basket.
    async fn store(&self, cart: ShoppingCart) -> DbResult<ShoppingCart> {
        validate_cart(&cart)?;

        let priced = self.reprice(&cart).await?;
        self.baskets.upsert(&priced).await?;

        debug!(
            user_name = %priced.user_name,
            total = %priced.total_price(),
            "Basket repriced"
        );
        Ok(priced)
    }

    /// Looks up applicable coupons once per product and prices the cart.
    async fn reprice(&self, cart: &ShoppingCart) -> DbResult<ShoppingCart> {
        let mut coupons_by_product: HashMap<String, Vec<Coupon>> = HashMap::new();

        for product_name in cart.product_names() {
            let coupons = self
                .coupons
                .find_applicable(&product_name, cart.code())
                .await?;
            coupons_by_product.insert(product_name, coupons);
        }

        Ok(price_cart(cart, &coupons_by_product))
    }
}

fn item_not_in_basket(user_name: &str, product_id: &str) -> CoreError {
    CoreError::ItemNotInBasket {
        user_name: user_name.to_string(),
        product_id: product_id.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use eshop_core::Money;

    const IPHONE_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
    const SAMSUNG_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    async fn setup() -> (Database, BasketService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coupons = db.coupons();

        coupons
            .insert(&Coupon::for_product("IPhone X").with_percentage(10.0))
            .await
            .unwrap();
        coupons
            .insert(
                &Coupon::for_product("IPhone X")
                    .with_amount(Money::from_cents(5000))
                    .with_code("SPRING"),
            )
            .await
            .unwrap();

        let service = db.basket_service();
        (db, service)
    }

    fn iphone(quantity: i64) -> ShoppingCartItem {
        ShoppingCartItem::new(IPHONE_ID, "IPhone X", Money::from_cents(95000), quantity)
    }

    fn samsung(quantity: i64) -> ShoppingCartItem {
        ShoppingCartItem::new(SAMSUNG_ID, "Samsung 10", Money::from_cents(84000), quantity)
    }

    #[tokio::test]
    async fn test_create_basket_prices_items() {
        let (_db, service) = setup().await;

        let cart = ShoppingCart::new("swn").with_item(iphone(2)).with_item(samsung(1));
        let priced = service.create_basket(cart).await.unwrap();

        assert_eq!(priced.items[0].price, Money::from_cents(85500));
        assert_eq!(priced.items[1].price, Money::from_cents(84000));
        assert_eq!(priced.total_price(), Money::from_cents(255000));
        assert_eq!(service.get_basket("swn").await.unwrap(), priced);
    }

    #[tokio::test]
    async fn test_coupon_code_unlocks_code_coupons() {
        let (_db, service) = setup().await;

        let cart = ShoppingCart::new("swn")
            .with_coupon_code("SPRING")
            .with_item(iphone(1));
        let priced = service.create_basket(cart).await.unwrap();

        // 950.00 - 10% - 50.00
        assert_eq!(priced.items[0].price, Money::from_cents(80500));
    }

    #[tokio::test]
    async fn test_add_item_creates_and_merges() {
        let (_db, service) = setup().await;

        service.add_item("swn", iphone(1)).await.unwrap();
        service.add_item("swn", samsung(1)).await.unwrap();
        let cart = service.add_item("swn", iphone(2)).await.unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item(IPHONE_ID).unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_add_item_over_limit_is_rejected() {
        let (_db, service) = setup().await;
        service.add_item("swn", iphone(998)).await.unwrap();

        let err = service.add_item("swn", iphone(2)).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get_basket("swn").await.unwrap().items[0].quantity, 998);
    }

    #[tokio::test]
    async fn test_add_item_rejects_bad_quantity_before_merging() {
        let (_db, service) = setup().await;
        service.add_item("swn", iphone(5)).await.unwrap();

        let err = service.add_item("swn", iphone(i64::MAX)).await.unwrap_err();
        assert!(err.is_validation());

        let err = service.add_item("swn", iphone(-3)).await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(service.get_basket("swn").await.unwrap().items[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_update_item_quantity() {
        let (_db, service) = setup().await;
        service.add_item("swn", iphone(1)).await.unwrap();

        let cart = service.update_item_quantity("swn", IPHONE_ID, 4).await.unwrap();
        assert_eq!(cart.total_price(), Money::from_cents(342000));

        assert!(service
            .update_item_quantity("swn", IPHONE_ID, 0)
            .await
            .unwrap_err()
            .is_validation());

        assert!(matches!(
            service.update_item_quantity("swn", SAMSUNG_ID, 1).await,
            Err(DbError::Domain(CoreError::ItemNotInBasket { .. }))
        ));
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (_db, service) = setup().await;
        service
            .create_basket(ShoppingCart::new("swn").with_item(iphone(1)).with_item(samsung(1)))
            .await
            .unwrap();

        let cart = service.remove_item("swn", IPHONE_ID).await.unwrap();
        assert_eq!(cart.items.len(), 1);

        assert!(matches!(
            service.remove_item("swn", IPHONE_ID).await,
            Err(DbError::Domain(CoreError::ItemNotInBasket { .. }))
        ));
    }

    #[tokio::test]
    async fn test_writes_pick_up_coupon_changes() {
        let (db, service) = setup().await;
        service.add_item("swn", samsung(1)).await.unwrap();

        db.coupons()
            .insert(&Coupon::for_product("Samsung 10").with_percentage(50.0))
            .await
            .unwrap();

        let cart = service.update_item_quantity("swn", SAMSUNG_ID, 1).await.unwrap();
        assert_eq!(cart.items[0].price, Money::from_cents(42000));
        assert_eq!(cart.items[0].unit_price, Money::from_cents(84000));
    }

    #[tokio::test]
    async fn test_missing_basket() {
        let (_db, service) = setup().await;

        assert!(matches!(
            service.get_basket("nobody").await,
            Err(DbError::Domain(CoreError::BasketNotFound(_)))
        ));
        assert!(matches!(
            service.delete_basket("nobody").await,
            Err(DbError::Domain(CoreError::BasketNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_basket() {
        let (_db, service) = setup().await;
        service.add_item("swn", iphone(1)).await.unwrap();

        service.delete_basket("swn").await.unwrap();
        assert!(service.get_basket("swn").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_item_is_rejected() {
        let (_db, service) = setup().await;
        let bad = ShoppingCartItem::new("not-a-uuid", "IPhone X", Money::from_cents(100), 1);

        assert!(service.add_item("swn", bad).await.unwrap_err().is_validation());
        assert!(service.add_item("", iphone(1)).await.unwrap_err().is_validation());
    }
}
