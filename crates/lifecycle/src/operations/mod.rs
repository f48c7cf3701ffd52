// Path: crates/lifecycle/src/operations/mod.rs

//! The lifecycle operations: package, install, approve, commit and the six
//! read-only queries.
//!
//! Each operation is one state transition. Local validation (types, labels,
//! policies, collections) happens before any peer is contacted; transport
//! failures are reported once and never retried here.

mod definition;
mod install;
mod package;
mod query;

pub use definition::{approve_chaincode, commit_chaincode};
pub use install::install_chaincode;
pub use package::{package_chaincode, validate_label};
pub use query::{
    query_all_installed_chaincodes, query_commit_readiness, query_defined_chaincode,
    query_defined_chaincodes, query_installed_chaincode, query_installed_chaincode_package_file,
};

pub(crate) use package::build_package;

use hlf_telemetry::lifecycle_metrics;
use hlf_types::error::{ErrorCode, LifecycleError, Operation};
use hlf_types::{CollectionDefinition, EndorsementPolicy};
use std::path::PathBuf;
use std::time::Duration;

/// Inputs to [`package_chaincode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// Root of the chaincode source tree.
    pub source_path: PathBuf,
    /// `golang`, `java` or `node`, in any case.
    pub chaincode_type: String,
    /// The package label recorded in its metadata.
    pub label: String,
    /// Optional directory of chaincode metadata (e.g. CouchDB indexes).
    pub metadata_path: Option<PathBuf>,
    /// Go path for golang chaincode. Falls back to the configured environment
    /// variable when unset.
    pub go_path: Option<PathBuf>,
}

impl PackageOptions {
    /// Options with no metadata directory and no explicit Go path.
    pub fn new(
        source_path: impl Into<PathBuf>,
        chaincode_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            chaincode_type: chaincode_type.into(),
            label: label.into(),
            metadata_path: None,
            go_path: None,
        }
    }

    /// Sets the metadata directory.
    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(path.into());
        self
    }

    /// Sets an explicit Go path.
    pub fn with_go_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.go_path = Some(path.into());
        self
    }
}

/// Parameters of an organization's approval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApprovalOptions {
    /// The definition sequence being approved.
    pub sequence: i64,
    /// Explicit endorsers. Empty lets the channel's default endorsement policy
    /// choose.
    pub peer_names: Vec<String>,
    /// The chaincode endorsement policy.
    pub endorsement_policy: Option<EndorsementPolicy>,
    /// Private data collections.
    pub collections: Option<Vec<CollectionDefinition>>,
    /// Whether `Init` must run before other invocations.
    pub init_required: Option<bool>,
    /// Endorsement plugin name.
    pub endorsement_plugin: Option<String>,
    /// Validation plugin name.
    pub validation_plugin: Option<String>,
    /// Budget for the submission.
    pub timeout: Option<Duration>,
}

impl ApprovalOptions {
    /// Approval of `sequence` with every other field unset.
    pub fn new(sequence: i64) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    /// Sets explicit endorsers.
    pub fn with_peers<I, S>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.peer_names = peers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the endorsement policy.
    pub fn with_endorsement_policy(mut self, policy: EndorsementPolicy) -> Self {
        self.endorsement_policy = Some(policy);
        self
    }

    /// Sets the private data collections.
    pub fn with_collections(mut self, collections: Vec<CollectionDefinition>) -> Self {
        self.collections = Some(collections);
        self
    }

    /// Sets whether `Init` is required.
    pub fn with_init_required(mut self, init_required: bool) -> Self {
        self.init_required = Some(init_required);
        self
    }

    /// Sets the submission budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Parameters of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitOptions {
    /// Explicit endorsers. Empty lets the channel's default endorsement policy
    /// choose.
    pub peer_names: Vec<String>,
    /// Budget for the submission.
    pub timeout: Option<Duration>,
}

impl CommitOptions {
    /// Commit with explicit endorsers.
    pub fn with_peers<I, S>(peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            peer_names: peers.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }
}

/// Records a failed operation before handing the result back.
fn observe<T>(stage: Operation, result: Result<T, LifecycleError>) -> Result<T, LifecycleError> {
    if let Err(err) = &result {
        lifecycle_metrics().inc_operation_failures(stage.as_str(), err.code());
        tracing::warn!(
            target: "lifecycle",
            %stage,
            code = err.code(),
            error = %err,
            "lifecycle operation failed"
        );
    }
    result
}

fn lifecycle_function(stage: Operation) -> Result<&'static str, LifecycleError> {
    stage
        .lifecycle_function()
        .ok_or_else(|| LifecycleError::Config(format!("{} has no lifecycle function", stage)))
}
