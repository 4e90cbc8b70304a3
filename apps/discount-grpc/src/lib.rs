//! # eShop Discount gRPC
//!
//! gRPC server answering "which coupons apply to this product, and what
//! does it cost after them" for the basket service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Discount gRPC Services                            │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌────────────────────────────────┐  │
//! │  │  DiscountProtoService        │  │  HealthService                 │  │
//! │  │                              │  │                                │  │
//! │  │ • GetDiscount                │  │ • Check                        │  │
//! │  │ • CreateDiscount             │  │ • Watch (server stream)        │  │
//! │  │ • UpdateDiscount             │  │                                │  │
//! │  │ • DeleteDiscount             │  │                                │  │
//! │  └──────────────┬───────────────┘  └───────────────┬────────────────┘  │
//! │                 │                                  │                   │
//! │                 ▼                                  ▼                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState { db: eshop_db::Database, config: DiscountConfig }     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Every key can be overridden with a `DISCOUNT_` variable,
//! e.g. `DISCOUNT_GRPC_PORT=6000` or `DISCOUNT_DATABASE_PATH=:memory:`.

pub mod config;
pub mod error;
pub mod mapping;
pub mod proto;
pub mod services;

use std::sync::Arc;

use eshop_db::{seed, Database, DbResult};
use tonic::transport::server::Router;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::proto::{
    discount_proto_service_server::DiscountProtoServiceServer,
    health_service_server::HealthServiceServer,
};
use crate::services::{discount_service::DiscountServiceImpl, health_service::HealthServiceImpl};

// Re-exports
pub use config::DiscountConfig;
pub use error::{ServiceError, ServiceResult};

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: DiscountConfig,
}

impl AppState {
    /// Opens the database described by `config`, seeding it when asked.
    pub async fn connect(config: DiscountConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;

        if config.seed_on_startup {
            seed::seed_development_data(&db).await?;
        }

        Ok(AppState { db, config })
    }
}

/// Builds the gRPC router with every service registered.
pub fn router(state: Arc<AppState>) -> Router {
    Server::builder()
        .add_service(DiscountProtoServiceServer::new(DiscountServiceImpl::new(
            state.clone(),
        )))
        .add_service(HealthServiceServer::new(HealthServiceImpl::new(state)))
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Tracing initialized");
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State over a fresh in-memory store holding only the base rows.
    pub async fn test_state() -> Arc<AppState> {
        let config = DiscountConfig {
            database_path: ":memory:".to_string(),
            ..DiscountConfig::default()
        };

        Arc::new(AppState::connect(config).await.unwrap())
    }
}
