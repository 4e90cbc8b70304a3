//! # eshop-db: Database Layer for the Discount Service
//!
//! This crate provides storage for coupons and basket documents.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Discount Data Flow                               │
//! │                                                                         │
//! │  gRPC handler (GetDiscount)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     eshop-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CouponRepo    │    │ 0001_coupons │  │   │
//! │  │   │ SqlitePool    │◄───│ BasketRepo    │    │ 0002_baskets │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │ BasketService │ reprices on write     │   │
//! │  │                        │ (pricing.rs)  │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./discount.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Coupon and basket repositories
//! - [`pricing`] - Basket workflow that reprices on every write
//! - [`seed`] - Development coupon set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./discount.db")).await?;
//!
//! let coupons = db.coupons().find_applicable("IPhone X", None).await?;
//! let cart = db.basket_service().add_item("swn", item).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod pricing;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use pricing::BasketService;

// Repository re-exports for convenience
pub use repository::basket::BasketRepository;
pub use repository::coupon::CouponRepository;
