// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # HLF Lifecycle Test Utilities
//!
//! Scripted stand-ins for the lifecycle collaborators and builders for the
//! result payloads real peers return.

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use fixtures::TestNetwork;
pub use mocks::{MockPackager, MockPeer, MockSigner, MockTransactor, MockTransport};
