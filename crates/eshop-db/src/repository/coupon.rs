//! # Coupon Repository
//!
//! Database operations for coupons.
//!
//! ## Key Operations
//! - Applicable-coupon lookup (the eligibility rule in SQL)
//! - CRUD by id, plus the id-or-product lookup used by admin updates
//!
//! ## Applicable Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 find_applicable("IPhone X", "SPRING")                   │
//! │                                                                         │
//! │  coupons                                                               │
//! │  ┌────┬────────────┬──────┬────────┬──────┬────────┐                   │
//! │  │ id │ product    │ type │ code   │ pct  │ amount │                   │
//! │  ├────┼────────────┼──────┼────────┼──────┼────────┤                   │
//! │  │ 3  │ IPhone X   │ 0    │        │ 10.0 │        │ ← pct set         │
//! │  │ 4  │ IPhone X   │ 1    │ SPRING │      │ 5.00   │ ← code matches    │
//! │  │ 5  │ IPhone X   │ 1    │ VIP    │      │ 20.00  │   wrong code      │
//! │  │ 1  │ IPhone X   │ 0    │        │      │        │   no rule, no code│
//! │  │ 6  │ Samsung 10 │ 0    │        │ 15.0 │        │   other product   │
//! │  └────┴────────────┴──────┴────────┴──────┴────────┘                   │
//! │                                                                         │
//! │  Result: [3, 4] in id order                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Format
//! `amount` is TEXT holding a decimal string so fixed discounts never pass
//! through a float. Percentages are REAL.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use eshop_core::{Coupon, CouponType, Money};

/// Column list shared by every SELECT.
const COUPON_COLUMNS: &str = r#"
    id,
    product_name,
    description,
    coupon_type,
    code,
    percentage,
    amount,
    is_cumulative,
    max_cumulative_percentage,
    max_redemptions
"#;

/// A `coupons` row before the amount is parsed.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: i64,
    product_name: String,
    description: String,
    coupon_type: CouponType,
    code: Option<String>,
    percentage: Option<f64>,
    amount: Option<String>,
    is_cumulative: bool,
    max_cumulative_percentage: Option<f64>,
    max_redemptions: Option<i32>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = DbError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let amount = row
            .amount
            .as_deref()
            .map(str::parse::<Money>)
            .transpose()
            .map_err(|e| DbError::corrupt("Coupon", format!("id {}: {}", row.id, e)))?;

        Ok(Coupon {
            id: row.id,
            product_name: row.product_name,
            description: row.description,
            coupon_type: row.coupon_type,
            code: row.code,
            percentage: row.percentage,
            amount,
            is_cumulative: row.is_cumulative,
            max_cumulative_percentage: row.max_cumulative_percentage,
            max_redemptions: row.max_redemptions,
        })
    }
}

fn into_coupons(rows: Vec<CouponRow>) -> DbResult<Vec<Coupon>> {
    rows.into_iter().map(Coupon::try_from).collect()
}

/// Repository for coupon database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CouponRepository::new(pool);
///
/// // Coupons the customer may use
/// let coupons = repo.find_applicable("IPhone X", Some("SPRING")).await?;
///
/// // Admin lookup
/// let coupon = repo.get_by_id(4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Returns the coupons eligible for `product_name` given an optional code.
    ///
    /// ## Rule
    /// Exact product match, and either a percentage is set or the supplied
    /// non-empty code equals the code of a Code coupon. Rows come back in id
    /// order; the aggregator does not care about order.
    pub async fn find_applicable(
        &self,
        product_name: &str,
        code: Option<&str>,
    ) -> DbResult<Vec<Coupon>> {
        let code = code.unwrap_or("");

        debug!(product_name = %product_name, has_code = !code.is_empty(), "Finding applicable coupons");

        let sql = format!(
            r#"
            SELECT {COUPON_COLUMNS}
            FROM coupons
            WHERE product_name = ?1
            AND (
                percentage IS NOT NULL
                OR (?2 <> '' AND coupon_type = ?3 AND code = ?2)
            )
            ORDER BY id
            "#
        );

        let rows: Vec<CouponRow> = sqlx::query_as(&sql)
            .bind(product_name)
            .bind(code)
            .bind(CouponType::Code)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Applicable coupons found");
        into_coupons(rows)
    }

    /// Lists every coupon for a product, eligible or not.
    pub async fn list_by_product(&self, product_name: &str) -> DbResult<Vec<Coupon>> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE product_name = ?1 ORDER BY id");

        let rows: Vec<CouponRow> = sqlx::query_as(&sql)
            .bind(product_name)
            .fetch_all(&self.pool)
            .await?;

        into_coupons(rows)
    }

    /// Gets a coupon by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Coupon))` - Coupon found
    /// * `Ok(None)` - Coupon not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Coupon>> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = ?1");

        let row: Option<CouponRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Coupon::try_from).transpose()
    }

    /// Finds the first coupon whose id OR product name matches.
    ///
    /// Admin update/delete requests identify a coupon by either key, so a
    /// request carrying only a product name still resolves.
    pub async fn find_by_id_or_product(
        &self,
        id: i64,
        product_name: &str,
    ) -> DbResult<Option<Coupon>> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE id = ?1 OR product_name = ?2 ORDER BY id LIMIT 1"
        );

        let row: Option<CouponRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(product_name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Coupon::try_from).transpose()
    }

    /// Inserts a new coupon and returns it with the generated id.
    ///
    /// Any id on the input is ignored.
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<Coupon> {
        debug!(product_name = %coupon.product_name, "Inserting coupon");

        let result = sqlx::query(
            r#"
            INSERT INTO coupons (
                product_name, description, coupon_type, code,
                percentage, amount, is_cumulative,
                max_cumulative_percentage, max_redemptions
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&coupon.product_name)
        .bind(&coupon.description)
        .bind(coupon.coupon_type)
        .bind(&coupon.code)
        .bind(coupon.percentage)
        .bind(coupon.amount.map(|a| a.amount().to_string()))
        .bind(coupon.is_cumulative)
        .bind(coupon.max_cumulative_percentage)
        .bind(coupon.max_redemptions)
        .execute(&self.pool)
        .await?;

        Ok(Coupon {
            id: result.last_insert_rowid(),
            ..coupon.clone()
        })
    }

    /// Overwrites every field of the coupon with the same id.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - No coupon with this id
    pub async fn update(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(id = coupon.id, "Updating coupon");

        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                product_name = ?2,
                description = ?3,
                coupon_type = ?4,
                code = ?5,
                percentage = ?6,
                amount = ?7,
                is_cumulative = ?8,
                max_cumulative_percentage = ?9,
                max_redemptions = ?10
            WHERE id = ?1
            "#,
        )
        .bind(coupon.id)
        .bind(&coupon.product_name)
        .bind(&coupon.description)
        .bind(coupon.coupon_type)
        .bind(&coupon.code)
        .bind(coupon.percentage)
        .bind(coupon.amount.map(|a| a.amount().to_string()))
        .bind(coupon.is_cumulative)
        .bind(coupon.max_cumulative_percentage)
        .bind(coupon.max_redemptions)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", coupon.id.to_string()));
        }

        Ok(())
    }

    /// Deletes a coupon by id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting coupon");

        let result = sqlx::query("DELETE FROM coupons WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", id.to_string()));
        }

        Ok(())
    }

    /// Counts all coupons (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
