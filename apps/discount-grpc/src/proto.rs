//! Generated protobuf types and gRPC stubs for `discount.v1`.
//!
//! Built from `proto/discount.proto` by `build.rs`.

#![allow(clippy::all)]

tonic::include_proto!("discount.v1");
