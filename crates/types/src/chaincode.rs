// Path: crates/types/src/chaincode.rs

//! Chaincode identities and the values returned by lifecycle queries.

use crate::collection::CollectionDefinition;
use crate::error::LifecycleError;
use crate::policy::EndorsementPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The stable key of a chaincode across every lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChaincodeIdentity {
    /// The chaincode name.
    pub name: String,
    /// The chaincode version.
    pub version: String,
}

impl ChaincodeIdentity {
    /// Creates an identity from a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ChaincodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// The language runtimes a chaincode package can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaincodeType {
    /// Go chaincode. Packaging requires a Go path.
    Golang,
    /// Java chaincode.
    Java,
    /// Node.js chaincode.
    Node,
}

impl ChaincodeType {
    /// The lowercase name recorded in package metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Golang => "golang",
            Self::Java => "java",
            Self::Node => "node",
        }
    }
}

impl fmt::Display for ChaincodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChaincodeType {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "golang" => Ok(Self::Golang),
            "java" => Ok(Self::Java),
            "node" => Ok(Self::Node),
            _ => Err(LifecycleError::UnknownChaincodeType(s.to_string())),
        }
    }
}

/// The parameters of a chaincode definition as approved, committed or checked
/// for commit readiness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChaincodeDefinition {
    /// The chaincode name.
    pub name: String,
    /// The chaincode version.
    pub version: String,
    /// The definition sequence on the channel.
    pub sequence: i64,
    /// The endorsement policy; the channel default applies when absent.
    pub endorsement_policy: Option<EndorsementPolicy>,
    /// Private data collections, if any.
    pub collections: Option<Vec<CollectionDefinition>>,
    /// Whether an `Init` invocation is required before other transactions.
    pub init_required: Option<bool>,
    /// The endorsement plugin name.
    pub endorsement_plugin: Option<String>,
    /// The validation plugin name.
    pub validation_plugin: Option<String>,
}

impl ChaincodeDefinition {
    /// Creates a definition with only the identity and sequence set.
    pub fn new(identity: &ChaincodeIdentity, sequence: i64) -> Self {
        Self {
            name: identity.name.clone(),
            version: identity.version.clone(),
            sequence,
            ..Default::default()
        }
    }
}

/// One installed package as seen from one channel reference.
///
/// A package referenced by no channel yields a single record whose channel,
/// name and version are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstalledChannelChaincode {
    /// The channel the package is referenced on, or empty.
    pub channel_name: String,
    /// The chaincode name on that channel, or empty.
    pub name: String,
    /// The chaincode version on that channel, or empty.
    pub version: String,
    /// The peer-assigned package ID.
    pub package_id: String,
    /// The package label.
    pub label: String,
}

/// A chaincode definition as recorded on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefinedChaincode {
    /// The chaincode name.
    pub name: String,
    /// The chaincode version.
    pub version: String,
    /// The committed sequence.
    pub sequence: i64,
    /// The committed endorsement policy, if one was set.
    pub endorsement_policy: Option<EndorsementPolicy>,
    /// The committed private data collections.
    pub collections: Vec<CollectionDefinition>,
    /// Whether `Init` must be invoked first.
    pub init_required: bool,
    /// The endorsement plugin name.
    pub endorsement_plugin: String,
    /// The validation plugin name.
    pub validation_plugin: String,
    /// Which organizations approved this exact sequence. Empty for list queries,
    /// which do not report approvals.
    pub approvals: BTreeMap<String, bool>,
}

/// Per-organization approval status for a prospective definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitReadiness {
    /// MSP ID to approval status.
    pub approvals: BTreeMap<String, bool>,
}

impl CommitReadiness {
    /// Whether the organization has approved the definition.
    pub fn is_approved_by(&self, msp_id: &str) -> bool {
        self.approvals.get(msp_id).copied().unwrap_or(false)
    }

    /// Organizations whose approval is recorded.
    pub fn approved(&self) -> impl Iterator<Item = &str> {
        self.approvals
            .iter()
            .filter(|(_, approved)| **approved)
            .map(|(org, _)| org.as_str())
    }

    /// Organizations that have not approved yet.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.approvals
            .iter()
            .filter(|(_, approved)| !**approved)
            .map(|(org, _)| org.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chaincode_type_parses_case_insensitively() {
        assert_eq!("GOLANG".parse::<ChaincodeType>().unwrap(), ChaincodeType::Golang);
        assert_eq!("Java".parse::<ChaincodeType>().unwrap(), ChaincodeType::Java);
        assert_eq!("node".parse::<ChaincodeType>().unwrap(), ChaincodeType::Node);
    }

    #[test]
    fn unknown_chaincode_type_is_rejected() {
        let err = "typescript".parse::<ChaincodeType>().unwrap_err();
        assert_eq!(
            err,
            LifecycleError::UnknownChaincodeType("typescript".to_string())
        );
    }

    #[test]
    fn commit_readiness_partitions_orgs() {
        let readiness = CommitReadiness {
            approvals: [("Org1MSP".to_string(), true), ("Org2MSP".to_string(), false)]
                .into_iter()
                .collect(),
        };
        assert!(readiness.is_approved_by("Org1MSP"));
        assert!(!readiness.is_approved_by("Org2MSP"));
        assert!(!readiness.is_approved_by("Org3MSP"));
        assert_eq!(readiness.approved().collect::<Vec<_>>(), vec!["Org1MSP"]);
        assert_eq!(readiness.pending().collect::<Vec<_>>(), vec!["Org2MSP"]);
    }

    #[test]
    fn definition_starts_from_identity() {
        let id = ChaincodeIdentity::new("asset-transfer", "1.0");
        let def = ChaincodeDefinition::new(&id, 3);
        assert_eq!(def.name, "asset-transfer");
        assert_eq!(def.version, "1.0");
        assert_eq!(def.sequence, 3);
        assert!(def.endorsement_policy.is_none());
        assert_eq!(id.to_string(), "asset-transfer@1.0");
    }
}
