// Path: crates/proto/src/lib.rs
//! # HLF Lifecycle Protobuf Bindings
//!
//! Strongly typed bindings for the subset of the Fabric protobuf schema the
//! lifecycle engine speaks. Each module mirrors one protobuf package and keeps
//! its message names, field names and tag numbers exactly, so the encodings are
//! interchangeable with those produced by real peers:
//!
//! - [`lifecycle`]: `peer/lifecycle/lifecycle.proto` (package `lifecycle`)
//! - [`peer`]: `peer/policy.proto` and `peer/collection.proto` (package `protos`)
//! - [`common`]: `common/policies.proto` (package `common`)
//! - [`msp`]: `msp/msp_principal.proto` (package `common`, `msp` namespace)
//!
//! The bindings are written in the form `prost-build` emits, which keeps the
//! build free of a `protoc` dependency.

pub mod common;
pub mod lifecycle;
pub mod msp;
pub mod peer;

// Re-export for downstream `encode_to_vec`/`decode` calls.
pub use prost::Message;
