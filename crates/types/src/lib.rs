// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # HLF Lifecycle Types
//!
//! The foundational library for the chaincode lifecycle workspace. It holds the
//! data model shared by every other crate: chaincode identities and query
//! results, endorsement policy and private data collection definitions, the
//! runtime configuration and the error taxonomy.
//!
//! ## Architectural Role
//!
//! `hlf-types` has no knowledge of the wire format or of any transport. The
//! protobuf bindings live in `hlf-proto`, collaborator traits in `hlf-api`, and
//! the orchestration itself in `hlf-lifecycle`. Keeping this crate free of those
//! concerns prevents circular dependencies between them.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::LifecycleError> = std::result::Result<T, E>;

/// Chaincode identities, chaincode types and the results of lifecycle queries.
pub mod chaincode;
/// Private data collection definitions.
pub mod collection;
/// Runtime configuration for lifecycle orchestration.
pub mod config;
/// The lifecycle error taxonomy.
pub mod error;
/// Endorsement policy definitions and the policy expression language.
pub mod policy;

pub use chaincode::{
    ChaincodeDefinition, ChaincodeIdentity, ChaincodeType, CommitReadiness, DefinedChaincode,
    InstalledChannelChaincode,
};
pub use collection::{CollectionDefinition, CollectionEndorsementPolicy, CollectionMemberPolicy};
pub use config::LifecycleConfig;
pub use error::{ErrorCode, LifecycleError, Operation, TransportError};
pub use policy::{EndorsementPolicy, MspRole, PolicyIdentity, PolicyRule, SignaturePolicySpec};
