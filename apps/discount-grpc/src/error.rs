//! Error types for the discount gRPC service.
//!
//! ```text
//! ValidationError ─┐
//! CoreError ───────┼──► ServiceError ──► tonic::Status
//! DbError ─────────┘
//! ```

use eshop_core::{CoreError, ValidationError};
use eshop_db::DbError;
use tonic::Status;

/// Service errors, one variant per gRPC status the service returns.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    AlreadyExists(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for service handlers.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        ServiceError::InvalidArgument(error.to_string())
    }
}

impl From<CoreError> for ServiceError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(e) => e.into(),
            CoreError::BasketNotFound(_)
            | CoreError::ItemNotInBasket { .. }
            | CoreError::CouponNotFound { .. } => ServiceError::NotFound(error.to_string()),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::Domain(e) => e.into(),
            DbError::NotFound { .. } => ServiceError::NotFound(error.to_string()),
            DbError::UniqueViolation { .. } => ServiceError::AlreadyExists(error.to_string()),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                ServiceError::Unavailable(error.to_string())
            }
            DbError::CorruptData { .. }
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::Internal(_) => ServiceError::Internal(error.to_string()),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidArgument(msg) => Status::invalid_argument(msg),
            ServiceError::NotFound(msg) => Status::not_found(msg),
            ServiceError::AlreadyExists(msg) => Status::already_exists(msg),
            ServiceError::Internal(msg) => Status::internal(msg),
            ServiceError::Unavailable(msg) => Status::unavailable(msg),
        }
    }
}
