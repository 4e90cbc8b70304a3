//! Discount gRPC server entry point.
//!
//! ```text
//! load config ──► init tracing ──► open database ──► serve :5052
//!                                  (migrate, seed?)       │
//!                                                         ▼
//!                                          Ctrl+C / SIGTERM ──► close pool
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use discount_grpc::{init_tracing, router, AppState, DiscountConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = DiscountConfig::load_from(config_path.as_deref())?;

    init_tracing(&config.log_filter);

    info!("Starting discount gRPC server...");
    info!(
        port = config.grpc_port,
        database = %config.database_path,
        seed = config.seed_on_startup,
        "Configuration loaded"
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.grpc_port).parse()?;

    let state = Arc::new(AppState::connect(config).await?);
    info!("Database ready");

    info!(%addr, "Starting gRPC server");

    router(state.clone())
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that fails to install never fires; the other one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
