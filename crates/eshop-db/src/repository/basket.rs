//! # Basket Repository
//!
//! Stores each shopping cart as a single JSON document keyed by user name.
//!
//! ```text
//! baskets
//! ┌───────────┬──────────────────────────────────────────────┬────────────┐
//! │ user_name │ document                                     │ updated_at │
//! ├───────────┼──────────────────────────────────────────────┼────────────┤
//! │ swn       │ {"userName":"swn","items":[{...},{...}],...} │ 2024-...   │
//! └───────────┴──────────────────────────────────────────────┴────────────┘
//! ```
//!
//! Writes replace the whole document; there is no partial update.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use eshop_core::ShoppingCart;

/// Repository for basket documents.
#[derive(Debug, Clone)]
pub struct BasketRepository {
    pool: SqlitePool,
}

impl BasketRepository {
    /// Creates a new BasketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BasketRepository { pool }
    }

    /// Loads the basket for a user.
    ///
    /// ## Returns
    /// * `Ok(Some(ShoppingCart))` - Basket found
    /// * `Ok(None)` - User has no basket
    pub async fn get(&self, user_name: &str) -> DbResult<Option<ShoppingCart>> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM baskets WHERE user_name = ?1")
                .bind(user_name)
                .fetch_optional(&self.pool)
                .await?;

        document
            .map(|doc| serde_json::from_str(&doc))
            .transpose()
            .map_err(DbError::from)
    }

    /// Returns when the basket was last written.
    pub async fn updated_at(&self, user_name: &str) -> DbResult<Option<DateTime<Utc>>> {
        let updated_at: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT updated_at FROM baskets WHERE user_name = ?1")
                .bind(user_name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(updated_at)
    }

    /// Inserts or replaces the basket document.
    pub async fn upsert(&self, cart: &ShoppingCart) -> DbResult<()> {
        debug!(user_name = %cart.user_name, items = cart.items.len(), "Storing basket");

        let document = serde_json::to_string(cart)?;

        sqlx::query(
            r#"
            INSERT INTO baskets (user_name, document, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_name) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&cart.user_name)
        .bind(document)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the basket for a user.
    ///
    /// ## Returns
    /// * `Ok(true)` - A basket was deleted
    /// * `Ok(false)` - There was nothing to delete
    pub async fn delete(&self, user_name: &str) -> DbResult<bool> {
        debug!(user_name = %user_name, "Deleting basket");

        let result = sqlx::query("DELETE FROM baskets WHERE user_name = ?1")
            .bind(user_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use eshop_core::{Money, ShoppingCartItem};

    async fn repo() -> BasketRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().baskets()
    }

    fn cart() -> ShoppingCart {
        ShoppingCart::new("swn").with_item(ShoppingCartItem::new(
            uuid::Uuid::new_v4().to_string(),
            "IPhone X",
            Money::from_cents(95000),
            1,
        ))
    }

    #[tokio::test]
    async fn test_missing_basket_is_none() {
        let repo = repo().await;
        assert!(repo.get("nobody").await.unwrap().is_none());
        assert!(repo.updated_at("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = repo().await;
        let cart = cart();

        repo.upsert(&cart).await.unwrap();

        assert_eq!(repo.get("swn").await.unwrap(), Some(cart));
        assert!(repo.updated_at("swn").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_replaces_document() {
        let repo = repo().await;
        let mut cart = cart();
        repo.upsert(&cart).await.unwrap();

        cart.items.clear();
        cart.coupon_code = Some("SPRING".to_string());
        repo.upsert(&cart).await.unwrap();

        let stored = repo.get("swn").await.unwrap().unwrap();
        assert!(stored.is_empty());
        assert_eq!(stored.code(), Some("SPRING"));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.upsert(&cart()).await.unwrap();

        assert!(repo.delete("swn").await.unwrap());
        assert!(!repo.delete("swn").await.unwrap());
        assert!(repo.get("swn").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let repo = repo().await;
        sqlx::query("INSERT INTO baskets (user_name, document, updated_at) VALUES ('bad', '{', '2024-01-01T00:00:00Z')")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(matches!(
            repo.get("bad").await,
            Err(DbError::CorruptData { .. })
        ));
    }
}
