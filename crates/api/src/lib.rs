// Path: crates/api/src/lib.rs

//! # HLF Lifecycle API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # HLF Lifecycle API
//!
//! The contracts between the lifecycle engine and the collaborators it drives
//! but does not implement: the peer transport, the signing identity, the
//! ordered transaction pipeline and the archive packager. Implementations live
//! outside this workspace (or in `hlf-test-utils` for tests).

/// The bundle of collaborators a lifecycle call operates against.
pub mod context;
/// Building installable chaincode archives.
pub mod packaging;
/// Signing endorsement requests.
pub mod signing;
/// Ordered channel transaction submission.
pub mod submission;
/// Peer resolution and proposal delivery.
pub mod transport;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::context::NetworkContext;
    pub use crate::packaging::PackagingUtility;
    pub use crate::signing::SigningContext;
    pub use crate::submission::{ChannelTransactor, TransactionSubmission};
    pub use crate::transport::{
        EndorsementRequest, PeerHandle, PeerTransport, ProposalResponse, SignedProposal,
    };
}
