// Path: crates/types/src/error/mod.rs
//! Core error types for chaincode lifecycle orchestration.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// The lifecycle stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Building an installable chaincode archive.
    Package,
    /// Installing a package on a set of peers.
    Install,
    /// Approving a chaincode definition for the caller's organization.
    Approve,
    /// Committing a chaincode definition to a channel.
    Commit,
    /// Querying a single installed package on a peer.
    QueryInstalled,
    /// Querying every installed package on a peer.
    QueryAllInstalled,
    /// Fetching the raw archive of an installed package.
    QueryInstalledPackage,
    /// Querying a single committed chaincode definition.
    QueryDefined,
    /// Querying every committed chaincode definition on a channel.
    QueryAllDefined,
    /// Checking which organizations have approved a prospective definition.
    CheckCommitReadiness,
}

impl Operation {
    /// The `_lifecycle` system chaincode function invoked for this stage, if any.
    ///
    /// Packaging happens entirely on the client and has no function.
    pub fn lifecycle_function(self) -> Option<&'static str> {
        match self {
            Self::Package => None,
            Self::Install => Some("InstallChaincode"),
            Self::Approve => Some("ApproveChaincodeDefinitionForMyOrg"),
            Self::Commit => Some("CommitChaincodeDefinition"),
            Self::QueryInstalled => Some("QueryInstalledChaincode"),
            Self::QueryAllInstalled => Some("QueryInstalledChaincodes"),
            Self::QueryInstalledPackage => Some("GetInstalledChaincodePackage"),
            Self::QueryDefined => Some("QueryChaincodeDefinition"),
            Self::QueryAllDefined => Some("QueryChaincodeDefinitions"),
            Self::CheckCommitReadiness => Some("CheckCommitReadiness"),
        }
    }

    /// A short, stable label used in log fields and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Install => "install",
            Self::Approve => "approve",
            Self::Commit => "commit",
            Self::QueryInstalled => "query_installed",
            Self::QueryAllInstalled => "query_all_installed",
            Self::QueryInstalledPackage => "query_installed_package",
            Self::QueryDefined => "query_defined",
            Self::QueryAllDefined => "query_all_defined",
            Self::CheckCommitReadiness => "check_commit_readiness",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by the transport, signing and submission collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the caller's budget.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The remote endpoint could not be reached.
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
    /// The remote endpoint processed the request and rejected it.
    #[error("{0}")]
    Rejected(String),
    /// The signing context could not sign the request.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl ErrorCode for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "TRANSPORT_TIMEOUT",
            Self::Unreachable(_) => "TRANSPORT_UNREACHABLE",
            Self::Rejected(_) => "TRANSPORT_REJECTED",
            Self::Signing(_) => "TRANSPORT_SIGNING_FAILED",
        }
    }
}

/// Errors raised by lifecycle orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The chaincode type is not one of `golang`, `java` or `node`.
    #[error("Unknown chaincode type '{0}'; expected one of golang, java, node")]
    UnknownChaincodeType(String),
    /// Golang chaincode was packaged without a Go path.
    #[error("A Go path is required to package golang chaincode; pass one explicitly or set ${env_var}")]
    MissingGoPath {
        /// The environment variable that was consulted.
        env_var: String,
    },
    /// A structured or expression endorsement policy is malformed.
    #[error("Invalid endorsement policy: {0}")]
    InvalidPolicy(String),
    /// A private data collection definition is malformed.
    #[error("Invalid collection configuration: {0}")]
    InvalidCollectionConfig(String),
    /// A package label does not satisfy the peer's label rules.
    #[error("Invalid package label '{label}': {reason}")]
    InvalidLabel {
        /// The rejected label.
        label: String,
        /// Why the label was rejected.
        reason: String,
    },
    /// Lifecycle configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The packaging utility failed to build an archive.
    #[error("Packaging failed: {0}")]
    Packaging(String),
    /// A peer name could not be resolved in the network context.
    #[error("Peer '{0}' was not found in the network context")]
    PeerNotFound(String),
    /// A resolved peer failed its connectivity check.
    #[error("Peer '{0}' is not connected")]
    PeerDisconnected(String),
    /// An operation that needs explicit endorsers was given none.
    #[error("No peers were supplied for {0}")]
    NoPeers(Operation),
    /// The targeted peers returned neither responses nor errors.
    #[error("{stage} failed: no responses were returned by the targeted peers")]
    NoResponse {
        /// The failing lifecycle stage.
        stage: Operation,
    },
    /// A peer failed to produce a proposal response.
    #[error("{stage} failed: peer '{peer}' returned an error: {message}")]
    PeerFailure {
        /// The failing lifecycle stage.
        stage: Operation,
        /// The peer that reported the error.
        peer: String,
        /// The error reported by the transport.
        message: String,
    },
    /// A peer answered with a non-success status.
    #[error("{stage} failed: peer '{peer}' returned status {status}: {message}")]
    BadStatus {
        /// The failing lifecycle stage.
        stage: Operation,
        /// The peer that answered.
        peer: String,
        /// The status code in the proposal response.
        status: i32,
        /// The message in the proposal response.
        message: String,
    },
    /// The signing context could not sign a request.
    #[error("{stage} failed: request could not be signed: {message}")]
    Signing {
        /// The failing lifecycle stage.
        stage: Operation,
        /// The signing error.
        message: String,
    },
    /// An ordered channel transaction was not accepted.
    #[error("{stage} failed: transaction submission was rejected: {message}")]
    Submission {
        /// The failing lifecycle stage.
        stage: Operation,
        /// The submission error.
        message: String,
    },
    /// A peer reported a package label other than the one installed.
    #[error("Peer '{peer}' returned package label '{got}' but '{expected}' was installed")]
    LabelMismatch {
        /// The peer that disagreed.
        peer: String,
        /// The label that was installed.
        expected: String,
        /// The label the peer returned.
        got: String,
    },
    /// Two peers computed different package IDs for the same archive.
    #[error("Peers disagree on the package ID: '{first}' and '{second}'")]
    PackageIdMismatch {
        /// The first package ID seen.
        first: String,
        /// The conflicting package ID.
        second: String,
    },
    /// A response payload could not be decoded.
    #[error("{stage} failed: could not decode {what}: {reason}")]
    Decode {
        /// The failing lifecycle stage.
        stage: Operation,
        /// The message that failed to decode.
        what: &'static str,
        /// The underlying decoder error.
        reason: String,
    },
}

impl LifecycleError {
    /// Wraps a collaborator error reported for a specific peer.
    pub fn peer_failure(stage: Operation, peer: impl Into<String>, err: &TransportError) -> Self {
        Self::PeerFailure {
            stage,
            peer: peer.into(),
            message: err.to_string(),
        }
    }

    /// Whether the error was detected before any request left the process.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownChaincodeType(_)
                | Self::MissingGoPath { .. }
                | Self::InvalidPolicy(_)
                | Self::InvalidCollectionConfig(_)
                | Self::InvalidLabel { .. }
                | Self::Config(_)
        )
    }
}

impl ErrorCode for LifecycleError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownChaincodeType(_) => "LIFECYCLE_UNKNOWN_CHAINCODE_TYPE",
            Self::MissingGoPath { .. } => "LIFECYCLE_MISSING_GO_PATH",
            Self::InvalidPolicy(_) => "LIFECYCLE_INVALID_POLICY",
            Self::InvalidCollectionConfig(_) => "LIFECYCLE_INVALID_COLLECTION_CONFIG",
            Self::InvalidLabel { .. } => "LIFECYCLE_INVALID_LABEL",
            Self::Config(_) => "LIFECYCLE_CONFIG",
            Self::Packaging(_) => "LIFECYCLE_PACKAGING_FAILED",
            Self::PeerNotFound(_) => "LIFECYCLE_PEER_NOT_FOUND",
            Self::PeerDisconnected(_) => "LIFECYCLE_PEER_DISCONNECTED",
            Self::NoPeers(_) => "LIFECYCLE_NO_PEERS",
            Self::NoResponse { .. } => "LIFECYCLE_NO_RESPONSE",
            Self::PeerFailure { .. } => "LIFECYCLE_PEER_FAILURE",
            Self::BadStatus { .. } => "LIFECYCLE_BAD_STATUS",
            Self::Signing { .. } => "LIFECYCLE_SIGNING_FAILED",
            Self::Submission { .. } => "LIFECYCLE_SUBMISSION_FAILED",
            Self::LabelMismatch { .. } => "LIFECYCLE_LABEL_MISMATCH",
            Self::PackageIdMismatch { .. } => "LIFECYCLE_PACKAGE_ID_MISMATCH",
            Self::Decode { .. } => "LIFECYCLE_DECODE_FAILED",
        }
    }
}
