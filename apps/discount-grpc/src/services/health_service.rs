//! Health check gRPC service implementation.
//!
//! Reports SERVING while the database answers `SELECT 1`.

use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_stream::{wrappers::ReceiverStream, Stream};
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::proto::{
    health_check_response::ServingStatus, health_service_server::HealthService,
    HealthCheckRequest, HealthCheckResponse, Timestamp as ProtoTimestamp,
};
use crate::AppState;

/// Health service implementation.
#[derive(Clone)]
pub struct HealthServiceImpl {
    state: Arc<AppState>,
}

impl HealthServiceImpl {
    /// Create a new health service.
    pub fn new(state: Arc<AppState>) -> Self {
        HealthServiceImpl { state }
    }

    /// Check the health of a specific service or overall system.
    async fn check_health(&self, service: &str) -> HealthCheckResponse {
        let (status, message) = match service {
            "" | "overall" | "database" => self.check_database_health().await,
            _ => (ServingStatus::Unknown, format!("Unknown service: {}", service)),
        };

        HealthCheckResponse {
            status: status as i32,
            message,
            server_time: Some(ProtoTimestamp {
                value: Utc::now().to_rfc3339(),
            }),
        }
    }

    /// Check database health.
    async fn check_database_health(&self) -> (ServingStatus, String) {
        if self.state.db.health_check().await {
            (ServingStatus::Serving, "Database connected".to_string())
        } else {
            warn!("Database health check failed");
            (ServingStatus::NotServing, "Database unavailable".to_string())
        }
    }
}

#[tonic::async_trait]
impl HealthService for HealthServiceImpl {
    /// Simple health check.
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();
        let response = self.check_health(&req.service).await;
        Ok(Response::new(response))
    }

    type WatchStream = Pin<Box<dyn Stream<Item = Result<HealthCheckResponse, Status>> + Send>>;

    /// Streaming health check; the first update is sent immediately.
    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let service = request.into_inner().service;
        let health_service = self.clone();
        let period = self.state.config.health_check_interval();

        info!(service = %service, "Starting health watch stream");

        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut check_interval = interval(period);

            loop {
                check_interval.tick().await;

                let response = health_service.check_health(&service).await;

                if tx.send(Ok(response)).await.is_err() {
                    // Client disconnected
                    break;
                }
            }

            info!(service = %service, "Health watch stream ended");
        });

        let output_stream = ReceiverStream::new(rx);
        Ok(Response::new(Box::pin(output_stream)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_check_serving() {
        let service = HealthServiceImpl::new(test_state().await);

        let response = service
            .check(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.status, ServingStatus::Serving as i32);
        assert!(response.server_time.is_some());
    }

    #[tokio::test]
    async fn test_check_unknown_service() {
        let service = HealthServiceImpl::new(test_state().await);

        let response = service
            .check(Request::new(HealthCheckRequest {
                service: "inventory".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.status, ServingStatus::Unknown as i32);
    }

    #[tokio::test]
    async fn test_check_not_serving_after_close() {
        let state = test_state().await;
        state.db.close().await;
        let service = HealthServiceImpl::new(state);

        let response = service
            .check(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.status, ServingStatus::NotServing as i32);
    }

    #[tokio::test]
    async fn test_watch_sends_first_update_immediately() {
        let service = HealthServiceImpl::new(test_state().await);

        let mut stream = service
            .watch(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap()
            .into_inner();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.status, ServingStatus::Serving as i32);
    }
}
