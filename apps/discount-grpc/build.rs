//! Build script for compiling Protocol Buffer definitions.
//!
//! This script compiles the .proto files into Rust code using tonic-build.
//! The generated code is placed in `$OUT_DIR` and included via `tonic::include_proto!`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tell Cargo to rerun this build script if the proto file changes
    println!("cargo:rerun-if-changed=../../proto/discount.proto");
    println!("cargo:rerun-if-changed=../../proto");

    // Client stubs serve the end-to-end tests and basket-side callers
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../../proto/discount.proto"], &["../../proto"])?;

    Ok(())
}
