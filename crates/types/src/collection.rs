// Path: crates/types/src/collection.rs

//! Private data collection definitions, in the JSON layout of a Fabric
//! collection configuration file.

use crate::error::LifecycleError;
use crate::policy::{EndorsementPolicy, SignaturePolicySpec};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// A static private data collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDefinition {
    /// The collection name, unique within the chaincode.
    pub name: String,
    /// Which organizations' peers hold the private data. Accepts an expression
    /// string or a structured policy object.
    #[serde(deserialize_with = "deserialize_member_policy")]
    pub policy: CollectionMemberPolicy,
    /// Peers that must receive the data before endorsement succeeds.
    #[serde(default)]
    pub required_peer_count: i32,
    /// Peers the data is disseminated to at most.
    #[serde(default)]
    pub max_peer_count: i32,
    /// Blocks after which the private data is purged; zero keeps it forever.
    #[serde(default)]
    pub block_to_live: u64,
    /// Restrict reads to collection members.
    #[serde(default)]
    pub member_only_read: bool,
    /// Restrict writes to collection members.
    #[serde(default)]
    pub member_only_write: bool,
    /// Collection-level endorsement policy overriding the chaincode's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsement_policy: Option<CollectionEndorsementPolicy>,
}

/// The organizations whose peers may hold a collection's private data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CollectionMemberPolicy {
    /// A signature policy over MSP role principals.
    Signature(SignaturePolicySpec),
    /// A serialized `SignaturePolicyEnvelope` read from a peer whose principals
    /// are not MSP roles. Carried unchanged.
    Raw(Vec<u8>),
}

impl CollectionMemberPolicy {
    /// The signature policy, unless the policy is only known as raw bytes.
    pub fn as_signature(&self) -> Option<&SignaturePolicySpec> {
        match self {
            Self::Signature(spec) => Some(spec),
            Self::Raw(_) => None,
        }
    }

    fn validate(&self) -> Result<(), LifecycleError> {
        match self {
            Self::Signature(spec) => spec.validate(),
            Self::Raw(bytes) if bytes.is_empty() => Err(LifecycleError::InvalidPolicy(
                "raw member policy is empty".to_string(),
            )),
            Self::Raw(_) => Ok(()),
        }
    }
}

impl From<SignaturePolicySpec> for CollectionMemberPolicy {
    fn from(spec: SignaturePolicySpec) -> Self {
        Self::Signature(spec)
    }
}

/// A collection-level endorsement policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionEndorsementPolicy {
    /// A signature policy over MSP principals.
    #[serde(deserialize_with = "deserialize_policy")]
    SignaturePolicy(SignaturePolicySpec),
    /// A reference to a channel configuration policy.
    ChannelConfigPolicy(String),
    /// A serialized `ApplicationPolicy` read from a peer that cannot be
    /// expressed as either of the above. Carried unchanged.
    #[serde(skip_deserializing)]
    Raw(Vec<u8>),
}

impl From<CollectionEndorsementPolicy> for EndorsementPolicy {
    fn from(policy: CollectionEndorsementPolicy) -> Self {
        match policy {
            CollectionEndorsementPolicy::SignaturePolicy(spec) => Self::Signature(spec),
            CollectionEndorsementPolicy::ChannelConfigPolicy(path) => {
                Self::ChannelConfigReference(path)
            }
            CollectionEndorsementPolicy::Raw(bytes) => Self::Raw(bytes),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyInput {
    Expression(String),
    Structured(SignaturePolicySpec),
}

fn deserialize_policy<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SignaturePolicySpec, D::Error> {
    match PolicyInput::deserialize(deserializer)? {
        PolicyInput::Expression(expr) => {
            SignaturePolicySpec::from_expression(&expr).map_err(de::Error::custom)
        }
        PolicyInput::Structured(spec) => Ok(spec),
    }
}

fn deserialize_member_policy<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<CollectionMemberPolicy, D::Error> {
    deserialize_policy(deserializer).map(CollectionMemberPolicy::Signature)
}

impl CollectionDefinition {
    /// Parses and validates a collection configuration file's contents.
    pub fn parse_json(json: &str) -> Result<Vec<Self>, LifecycleError> {
        let collections: Vec<Self> = serde_json::from_str(json)
            .map_err(|e| LifecycleError::InvalidCollectionConfig(e.to_string()))?;
        validate_collections(&collections)?;
        Ok(collections)
    }

    /// Checks a single collection's counts and policies.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        let invalid = |reason: String| {
            LifecycleError::InvalidCollectionConfig(format!("collection '{}': {}", self.name, reason))
        };
        if self.name.trim().is_empty() {
            return Err(LifecycleError::InvalidCollectionConfig(
                "collection name must not be empty".to_string(),
            ));
        }
        if self.required_peer_count < 0 || self.max_peer_count < 0 {
            return Err(invalid("peer counts must not be negative".to_string()));
        }
        if self.required_peer_count > self.max_peer_count {
            return Err(invalid(format!(
                "requiredPeerCount {} exceeds maxPeerCount {}",
                self.required_peer_count, self.max_peer_count
            )));
        }
        self.policy
            .validate()
            .map_err(|e| invalid(format!("member policy: {}", e)))?;
        if let Some(CollectionEndorsementPolicy::SignaturePolicy(spec)) = &self.endorsement_policy {
            spec.validate()
                .map_err(|e| invalid(format!("endorsement policy: {}", e)))?;
        }
        Ok(())
    }
}

/// Validates every collection and rejects duplicate names.
pub fn validate_collections(collections: &[CollectionDefinition]) -> Result<(), LifecycleError> {
    let mut seen = HashSet::new();
    for collection in collections {
        collection.validate()?;
        if !seen.insert(collection.name.as_str()) {
            return Err(LifecycleError::InvalidCollectionConfig(format!(
                "duplicate collection name '{}'",
                collection.name
            )));
        }
    }
    Ok(())
}
