//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  gRPC handler / BasketService                                          │
//! │       │                                                                 │
//! │       │  db.coupons().find_applicable("IPhone X", Some("SPRING"))      │
//! │       ▼                                                                 │
//! │  CouponRepository                  BasketRepository                    │
//! │  ├── find_applicable               ├── get                             │
//! │  ├── list_by_product               ├── upsert                          │
//! │  ├── get_by_id                     ├── updated_at                      │
//! │  ├── find_by_id_or_product         └── delete                          │
//! │  ├── insert / update / delete                                          │
//! │  └── count                                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CouponRepository`](coupon::CouponRepository) - Coupon lookup and CRUD
//! - [`BasketRepository`](basket::BasketRepository) - Basket documents

pub mod basket;
pub mod coupon;
