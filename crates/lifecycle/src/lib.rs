// Path: crates/lifecycle/src/lib.rs
#![forbid(unsafe_code)]
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

//! # HLF Lifecycle
//!
//! Orchestrates the Fabric chaincode lifecycle against a set of peers: build an
//! installable archive, install it, approve a definition for the caller's
//! organization, and commit that definition to a channel, plus the read-only
//! queries that inspect installed packages and committed definitions.
//!
//! The crate is layered bottom-up:
//!
//! - [`codec`] maps domain values to and from the `_lifecycle` protobuf messages.
//! - [`gateway`] resolves endorsers and fans signed proposals out to them.
//! - [`operations`] implements each lifecycle operation on top of the two.
//! - [`entities`] wraps the operations in a type-state chain
//!   (`ChaincodeSource` → `PackagedChaincode` → `InstalledChaincode` →
//!   `ApprovedChaincode`) so stages cannot be skipped.
//!
//! Transport, signing, ordering and archive construction are collaborators
//! defined in `hlf-api`.

/// Encoding of lifecycle arguments and decoding of lifecycle results.
pub mod codec;
/// The chaincode stage types.
pub mod entities;
/// Endorser resolution and proposal fan-out.
pub mod gateway;
/// The lifecycle operations.
pub mod operations;

pub use entities::{
    ApprovedChaincode, ChaincodeSource, ChaincodeStage, InstalledChaincode, PackagedChaincode,
};
pub use operations::{
    approve_chaincode, commit_chaincode, install_chaincode, package_chaincode,
    query_all_installed_chaincodes, query_commit_readiness, query_defined_chaincode,
    query_defined_chaincodes, query_installed_chaincode, query_installed_chaincode_package_file,
    ApprovalOptions, CommitOptions, PackageOptions,
};
