// Path: crates/lifecycle/src/entities.rs

//! The chaincode stages.
//!
//! Each stage is produced only by the transition out of the previous one, so a
//! definition cannot be approved before its package is installed, or committed
//! before it is approved:
//!
//! ```text
//! ChaincodeSource --package--> PackagedChaincode --install--> InstalledChaincode
//!     --approve--> ApprovedChaincode --commit (in place)
//! ```
//!
//! Transitions consume the prior stage. Clone it first to retry after a failure.

use crate::operations::{
    self, build_package, ApprovalOptions, CommitOptions, PackageOptions,
};
use hlf_api::context::NetworkContext;
use hlf_api::packaging::PackagingUtility;
use hlf_types::error::LifecycleError;
use hlf_types::{
    ChaincodeDefinition, ChaincodeIdentity, ChaincodeType, CollectionDefinition,
    EndorsementPolicy, InstalledChannelChaincode, LifecycleConfig,
};
use std::time::Duration;

/// Behaviour shared by every stage.
pub trait ChaincodeStage {
    /// The name and version the stage carries.
    fn identity(&self) -> &ChaincodeIdentity;

    /// The chaincode name.
    fn name(&self) -> &str {
        &self.identity().name
    }

    /// The chaincode version.
    fn version(&self) -> &str {
        &self.identity().version
    }
}

/// A chaincode that exists only as source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeSource {
    identity: ChaincodeIdentity,
}

impl ChaincodeSource {
    /// Starts a lifecycle for `name` at `version`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identity: ChaincodeIdentity::new(name, version),
        }
    }

    /// Builds the installable archive.
    pub async fn package(
        self,
        options: &PackageOptions,
        packager: &dyn PackagingUtility,
        config: &LifecycleConfig,
    ) -> Result<PackagedChaincode, LifecycleError> {
        let (chaincode_type, archive) =
            build_package(&self.identity, options, packager, config).await?;
        Ok(PackagedChaincode {
            identity: self.identity,
            label: options.label.clone(),
            chaincode_type,
            archive,
        })
    }
}

impl ChaincodeStage for ChaincodeSource {
    fn identity(&self) -> &ChaincodeIdentity {
        &self.identity
    }
}

/// A chaincode with its installable archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedChaincode {
    identity: ChaincodeIdentity,
    label: String,
    chaincode_type: ChaincodeType,
    archive: Vec<u8>,
}

impl PackagedChaincode {
    /// The package label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The language runtime the package targets.
    pub fn chaincode_type(&self) -> ChaincodeType {
        self.chaincode_type
    }

    /// The archive bytes.
    pub fn archive(&self) -> &[u8] {
        &self.archive
    }

    /// Installs the package on every named peer.
    pub async fn install<S: AsRef<str>>(
        self,
        peer_names: &[S],
        context: &NetworkContext,
        timeout: Option<Duration>,
    ) -> Result<InstalledChaincode, LifecycleError> {
        operations::install_chaincode(self, peer_names, context, timeout).await
    }
}

impl ChaincodeStage for PackagedChaincode {
    fn identity(&self) -> &ChaincodeIdentity {
        &self.identity
    }
}

/// A chaincode installed on peers, or known to be installed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledChaincode {
    identity: ChaincodeIdentity,
    label: String,
    chaincode_type: Option<ChaincodeType>,
    archive: Option<Vec<u8>>,
    package_id: Option<String>,
}

impl InstalledChaincode {
    pub(crate) fn from_install(packaged: PackagedChaincode, package_id: String) -> Self {
        Self {
            identity: packaged.identity,
            label: packaged.label,
            chaincode_type: Some(packaged.chaincode_type),
            archive: Some(packaged.archive),
            package_id: Some(package_id),
        }
    }

    /// A chaincode this organization has not installed, for approving a
    /// definition sight-unseen.
    pub fn unavailable(identity: ChaincodeIdentity, label: impl Into<String>) -> Self {
        Self {
            identity,
            label: label.into(),
            chaincode_type: None,
            archive: None,
            package_id: None,
        }
    }

    /// A package found by a query on one of this organization's peers.
    pub fn from_peer_record(identity: ChaincodeIdentity, record: &InstalledChannelChaincode) -> Self {
        Self {
            identity,
            label: record.label.clone(),
            chaincode_type: None,
            archive: None,
            package_id: Some(record.package_id.clone()).filter(|id| !id.is_empty()),
        }
    }

    /// The package label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The peer-assigned package ID, when the package is available locally.
    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref().filter(|id| !id.is_empty())
    }

    /// The language runtime, when this stage came from a local install.
    pub fn chaincode_type(&self) -> Option<ChaincodeType> {
        self.chaincode_type
    }

    /// The archive bytes, when this stage came from a local install.
    pub fn archive(&self) -> Option<&[u8]> {
        self.archive.as_deref()
    }

    /// Approves a definition of this chaincode for the signing organization.
    pub async fn approve(
        self,
        options: ApprovalOptions,
        context: &NetworkContext,
    ) -> Result<ApprovedChaincode, LifecycleError> {
        operations::approve_chaincode(self, options, context).await
    }
}

impl ChaincodeStage for InstalledChaincode {
    fn identity(&self) -> &ChaincodeIdentity {
        &self.identity
    }
}

/// A chaincode whose definition this organization approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedChaincode {
    installed: InstalledChaincode,
    definition: ChaincodeDefinition,
    committed: bool,
}

impl ApprovedChaincode {
    pub(crate) fn from_approval(installed: InstalledChaincode, definition: ChaincodeDefinition) -> Self {
        Self {
            installed,
            definition,
            committed: false,
        }
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }

    /// The approved definition, as it will be committed.
    pub fn definition(&self) -> &ChaincodeDefinition {
        &self.definition
    }

    /// The approved sequence.
    pub fn sequence(&self) -> i64 {
        self.definition.sequence
    }

    /// The approved endorsement policy.
    pub fn endorsement_policy(&self) -> Option<&EndorsementPolicy> {
        self.definition.endorsement_policy.as_ref()
    }

    /// The approved private data collections.
    pub fn collections(&self) -> Option<&[CollectionDefinition]> {
        self.definition.collections.as_deref()
    }

    /// Whether `Init` must be invoked first.
    pub fn init_required(&self) -> Option<bool> {
        self.definition.init_required
    }

    /// The package label.
    pub fn label(&self) -> &str {
        self.installed.label()
    }

    /// The approved package ID, if the approval referenced a local package.
    pub fn package_id(&self) -> Option<&str> {
        self.installed.package_id()
    }

    /// Whether the definition has been committed through this value.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Commits the approved definition to the channel. On failure the value is
    /// left as it was.
    pub async fn commit(
        &mut self,
        options: CommitOptions,
        context: &NetworkContext,
    ) -> Result<(), LifecycleError> {
        operations::commit_chaincode(self, options, context).await
    }
}

impl ChaincodeStage for ApprovedChaincode {
    fn identity(&self) -> &ChaincodeIdentity {
        self.installed.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_share_the_identity() {
        let source = ChaincodeSource::new("basic", "1.0");
        assert_eq!(source.name(), "basic");
        assert_eq!(source.version(), "1.0");

        let installed = InstalledChaincode::unavailable(source.identity().clone(), "basic_1.0");
        assert_eq!(installed.identity(), source.identity());
        assert_eq!(installed.package_id(), None);
        assert!(installed.archive().is_none());
    }

    #[test]
    fn empty_peer_record_id_is_unavailable() {
        let record = InstalledChannelChaincode {
            label: "basic_1.0".into(),
            ..Default::default()
        };
        let installed =
            InstalledChaincode::from_peer_record(ChaincodeIdentity::new("basic", "1.0"), &record);
        assert_eq!(installed.package_id(), None);
        assert_eq!(installed.label(), "basic_1.0");
    }

    #[test]
    fn approval_starts_uncommitted() {
        let identity = ChaincodeIdentity::new("basic", "1.0");
        let installed = InstalledChaincode::unavailable(identity.clone(), "basic_1.0");
        let mut approved =
            ApprovedChaincode::from_approval(installed, ChaincodeDefinition::new(&identity, 1));
        assert!(!approved.is_committed());
        assert_eq!(approved.sequence(), 1);
        approved.mark_committed();
        assert!(approved.is_committed());
    }
}
