//! # Error Types
//!
//! Domain-specific error types for eshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  eshop-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  eshop-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  discount-grpc errors (in app)                                         │
//! │  └── ServiceError     - Mapped onto tonic::Status                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount aggregator itself has no error type: it cannot fail.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No basket is stored for this user.
    #[error("Basket not found for user: {0}")]
    BasketNotFound(String),

    /// The basket exists but does not contain the product.
    ///
    /// ## When This Occurs
    /// - Updating the quantity of a product that was never added
    /// - Removing an item twice
    #[error("Product {product_id} not found in basket for user {user_name}")]
    ItemNotInBasket {
        user_name: String,
        product_id: String,
    },

    /// No coupon matches the given id or product name.
    #[error("Coupon with name {product_name} or id {id} not found")]
    CouponNotFound { product_name: String, id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before anything reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, unparseable decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
