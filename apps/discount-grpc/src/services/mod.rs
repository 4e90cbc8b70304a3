//! gRPC service implementations.
//!
//! Both services share the [`crate::AppState`] handed to them at startup.

pub mod discount_service;
pub mod health_service;
