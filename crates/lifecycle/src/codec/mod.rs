// Path: crates/lifecycle/src/codec/mod.rs

//! Encoding of `_lifecycle` arguments and decoding of their results.
//!
//! Every function here is pure. Encoders validate their input first, so a
//! malformed policy or collection fails before any request is built. Decoders
//! attribute failures to the lifecycle stage whose payload they read.

mod policy;

pub use policy::{decode_collections, decode_policy, encode_collections, encode_policy};

use hlf_proto::lifecycle::{
    chaincode_source, ApproveChaincodeDefinitionForMyOrgArgs, ChaincodeSource,
    CheckCommitReadinessArgs, CheckCommitReadinessResult, CommitChaincodeDefinitionArgs,
    GetInstalledChaincodePackageArgs, GetInstalledChaincodePackageResult, InstallChaincodeArgs,
    InstallChaincodeResult, QueryChaincodeDefinitionArgs, QueryChaincodeDefinitionResult,
    QueryChaincodeDefinitionsArgs, QueryChaincodeDefinitionsResult, QueryInstalledChaincodeArgs,
    QueryInstalledChaincodeResult, QueryInstalledChaincodesArgs, QueryInstalledChaincodesResult,
};
use hlf_proto::peer::CollectionConfigPackage;
use hlf_types::error::{LifecycleError, Operation};
use hlf_types::{
    ChaincodeDefinition, CommitReadiness, DefinedChaincode, InstalledChannelChaincode,
};
use prost::Message;
use std::collections::BTreeMap;

/// The fields shared by approve, commit and commit-readiness arguments.
struct DefinitionFields {
    sequence: i64,
    name: String,
    version: String,
    endorsement_plugin: String,
    validation_plugin: String,
    validation_parameter: Vec<u8>,
    collections: Option<CollectionConfigPackage>,
    init_required: bool,
}

impl DefinitionFields {
    fn compile(definition: &ChaincodeDefinition) -> Result<Self, LifecycleError> {
        let validation_parameter = match &definition.endorsement_policy {
            Some(policy) => encode_policy(policy)?,
            None => Vec::new(),
        };
        let collections = definition
            .collections
            .as_deref()
            .map(encode_collections)
            .transpose()?;
        Ok(Self {
            sequence: definition.sequence,
            name: definition.name.clone(),
            version: definition.version.clone(),
            endorsement_plugin: definition.endorsement_plugin.clone().unwrap_or_default(),
            validation_plugin: definition.validation_plugin.clone().unwrap_or_default(),
            validation_parameter,
            collections,
            init_required: definition.init_required.unwrap_or(false),
        })
    }
}

/// Encodes `InstallChaincodeArgs` around a packaged archive.
pub fn encode_install_args(archive: &[u8]) -> Vec<u8> {
    InstallChaincodeArgs {
        chaincode_install_package: archive.to_vec(),
    }
    .encode_to_vec()
}

/// Encodes `ApproveChaincodeDefinitionForMyOrgArgs`.
///
/// A missing or empty `package_id` approves the definition without a local
/// package (the `unavailable` source).
pub fn encode_approve_args(
    definition: &ChaincodeDefinition,
    package_id: Option<&str>,
) -> Result<Vec<u8>, LifecycleError> {
    let fields = DefinitionFields::compile(definition)?;
    let source = match package_id.filter(|id| !id.is_empty()) {
        Some(id) => chaincode_source::Type::LocalPackage(chaincode_source::Local {
            package_id: id.to_string(),
        }),
        None => chaincode_source::Type::Unavailable(chaincode_source::Unavailable {}),
    };
    Ok(ApproveChaincodeDefinitionForMyOrgArgs {
        sequence: fields.sequence,
        name: fields.name,
        version: fields.version,
        endorsement_plugin: fields.endorsement_plugin,
        validation_plugin: fields.validation_plugin,
        validation_parameter: fields.validation_parameter,
        collections: fields.collections,
        init_required: fields.init_required,
        source: Some(ChaincodeSource {
            r#type: Some(source),
        }),
    }
    .encode_to_vec())
}

/// Encodes `CommitChaincodeDefinitionArgs`.
pub fn encode_commit_args(definition: &ChaincodeDefinition) -> Result<Vec<u8>, LifecycleError> {
    let fields = DefinitionFields::compile(definition)?;
    Ok(CommitChaincodeDefinitionArgs {
        sequence: fields.sequence,
        name: fields.name,
        version: fields.version,
        endorsement_plugin: fields.endorsement_plugin,
        validation_plugin: fields.validation_plugin,
        validation_parameter: fields.validation_parameter,
        collections: fields.collections,
        init_required: fields.init_required,
    }
    .encode_to_vec())
}

/// The arguments of a read-only lifecycle query.
#[derive(Debug, Clone, Copy)]
pub enum QueryArgs<'a> {
    /// One installed package by ID.
    InstalledChaincode {
        /// The package to look up.
        package_id: &'a str,
    },
    /// Every installed package.
    AllInstalledChaincodes,
    /// The archive of one installed package.
    InstalledChaincodePackage {
        /// The package to fetch.
        package_id: &'a str,
    },
    /// One committed definition by chaincode name.
    DefinedChaincode {
        /// The chaincode name.
        name: &'a str,
    },
    /// Every committed definition on the channel.
    AllDefinedChaincodes,
    /// Approval status of a prospective definition.
    CommitReadiness(&'a ChaincodeDefinition),
}

impl QueryArgs<'_> {
    /// The lifecycle stage the query belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::InstalledChaincode { .. } => Operation::QueryInstalled,
            Self::AllInstalledChaincodes => Operation::QueryAllInstalled,
            Self::InstalledChaincodePackage { .. } => Operation::QueryInstalledPackage,
            Self::DefinedChaincode { .. } => Operation::QueryDefined,
            Self::AllDefinedChaincodes => Operation::QueryAllDefined,
            Self::CommitReadiness(_) => Operation::CheckCommitReadiness,
        }
    }

    /// Whether the query reads channel state rather than the peer's local store.
    pub fn is_channel_scoped(&self) -> bool {
        matches!(
            self,
            Self::DefinedChaincode { .. } | Self::AllDefinedChaincodes | Self::CommitReadiness(_)
        )
    }
}

/// Encodes the argument message of a query.
pub fn encode_query_args(query: &QueryArgs<'_>) -> Result<Vec<u8>, LifecycleError> {
    let bytes = match *query {
        QueryArgs::InstalledChaincode { package_id } => QueryInstalledChaincodeArgs {
            package_id: package_id.to_string(),
        }
        .encode_to_vec(),
        QueryArgs::AllInstalledChaincodes => QueryInstalledChaincodesArgs {}.encode_to_vec(),
        QueryArgs::InstalledChaincodePackage { package_id } => GetInstalledChaincodePackageArgs {
            package_id: package_id.to_string(),
        }
        .encode_to_vec(),
        QueryArgs::DefinedChaincode { name } => QueryChaincodeDefinitionArgs {
            name: name.to_string(),
        }
        .encode_to_vec(),
        QueryArgs::AllDefinedChaincodes => QueryChaincodeDefinitionsArgs {}.encode_to_vec(),
        QueryArgs::CommitReadiness(definition) => {
            let fields = DefinitionFields::compile(definition)?;
            CheckCommitReadinessArgs {
                sequence: fields.sequence,
                name: fields.name,
                version: fields.version,
                endorsement_plugin: fields.endorsement_plugin,
                validation_plugin: fields.validation_plugin,
                validation_parameter: fields.validation_parameter,
                collections: fields.collections,
                init_required: fields.init_required,
            }
            .encode_to_vec()
        }
    };
    Ok(bytes)
}

fn decode_message<M: Message + Default>(
    stage: Operation,
    what: &'static str,
    bytes: &[u8],
) -> Result<M, LifecycleError> {
    M::decode(bytes).map_err(|e| LifecycleError::Decode {
        stage,
        what,
        reason: e.to_string(),
    })
}

/// The package a peer reports after installing an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// The peer-computed package ID.
    pub package_id: String,
    /// The label recorded in the package metadata.
    pub label: String,
}

/// Decodes `InstallChaincodeResult`. A result without a package ID is rejected.
pub fn decode_install_result(bytes: &[u8]) -> Result<InstallResult, LifecycleError> {
    let result: InstallChaincodeResult =
        decode_message(Operation::Install, "InstallChaincodeResult", bytes)?;
    if result.package_id.is_empty() {
        return Err(LifecycleError::Decode {
            stage: Operation::Install,
            what: "InstallChaincodeResult",
            reason: "the result carries no package ID".to_string(),
        });
    }
    Ok(InstallResult {
        package_id: result.package_id,
        label: result.label,
    })
}

/// Expands one package's channel references into one record per referencing
/// chaincode. A package with no references yields a single record with empty
/// channel, name and version.
fn flatten_references<'a>(
    package_id: &str,
    label: &str,
    references: impl Iterator<Item = (&'a String, Vec<(&'a String, &'a String)>)>,
) -> Vec<InstalledChannelChaincode> {
    let mut records: Vec<InstalledChannelChaincode> = references
        .flat_map(|(channel, chaincodes)| {
            chaincodes
                .into_iter()
                .map(move |(name, version)| InstalledChannelChaincode {
                    channel_name: channel.clone(),
                    name: name.clone(),
                    version: version.clone(),
                    package_id: package_id.to_string(),
                    label: label.to_string(),
                })
        })
        .collect();
    if records.is_empty() {
        records.push(InstalledChannelChaincode {
            package_id: package_id.to_string(),
            label: label.to_string(),
            ..Default::default()
        });
    }
    records
}

/// Decodes `QueryInstalledChaincodeResult` into flattened records.
pub fn decode_query_installed_result(
    bytes: &[u8],
) -> Result<Vec<InstalledChannelChaincode>, LifecycleError> {
    let result: QueryInstalledChaincodeResult = decode_message(
        Operation::QueryInstalled,
        "QueryInstalledChaincodeResult",
        bytes,
    )?;
    Ok(flatten_references(
        &result.package_id,
        &result.label,
        result.references.iter().map(|(channel, refs)| {
            (
                channel,
                refs.chaincodes.iter().map(|cc| (&cc.name, &cc.version)).collect(),
            )
        }),
    ))
}

/// Decodes `QueryInstalledChaincodesResult` into flattened records, package by
/// package in the order the peer listed them.
pub fn decode_query_all_installed_result(
    bytes: &[u8],
) -> Result<Vec<InstalledChannelChaincode>, LifecycleError> {
    let result: QueryInstalledChaincodesResult = decode_message(
        Operation::QueryAllInstalled,
        "QueryInstalledChaincodesResult",
        bytes,
    )?;
    Ok(result
        .installed_chaincodes
        .iter()
        .flat_map(|installed| {
            flatten_references(
                &installed.package_id,
                &installed.label,
                installed.references.iter().map(|(channel, refs)| {
                    (
                        channel,
                        refs.chaincodes.iter().map(|cc| (&cc.name, &cc.version)).collect(),
                    )
                }),
            )
        })
        .collect())
}

/// Decodes `GetInstalledChaincodePackageResult`, returning the archive bytes.
pub fn decode_installed_package_result(bytes: &[u8]) -> Result<Vec<u8>, LifecycleError> {
    let result: GetInstalledChaincodePackageResult = decode_message(
        Operation::QueryInstalledPackage,
        "GetInstalledChaincodePackageResult",
        bytes,
    )?;
    Ok(result.chaincode_install_package)
}

/// Decodes `QueryChaincodeDefinitionResult`. The result does not repeat the
/// chaincode name, so the caller supplies the name it queried.
pub fn decode_defined_chaincode_result(
    name: &str,
    bytes: &[u8],
) -> Result<DefinedChaincode, LifecycleError> {
    let stage = Operation::QueryDefined;
    let result: QueryChaincodeDefinitionResult =
        decode_message(stage, "QueryChaincodeDefinitionResult", bytes)?;
    Ok(DefinedChaincode {
        name: name.to_string(),
        version: result.version,
        sequence: result.sequence,
        endorsement_policy: decode_policy(stage, &result.validation_parameter)?,
        collections: decode_collections(stage, result.collections.as_ref())?,
        init_required: result.init_required,
        endorsement_plugin: result.endorsement_plugin,
        validation_plugin: result.validation_plugin,
        approvals: result.approvals,
    })
}

/// Decodes `QueryChaincodeDefinitionsResult`. List results carry no approvals.
pub fn decode_defined_chaincodes_result(
    bytes: &[u8],
) -> Result<Vec<DefinedChaincode>, LifecycleError> {
    let stage = Operation::QueryAllDefined;
    let result: QueryChaincodeDefinitionsResult =
        decode_message(stage, "QueryChaincodeDefinitionsResult", bytes)?;
    result
        .chaincode_definitions
        .into_iter()
        .map(|definition| -> Result<DefinedChaincode, LifecycleError> {
            Ok(DefinedChaincode {
                endorsement_policy: decode_policy(stage, &definition.validation_parameter)?,
                collections: decode_collections(stage, definition.collections.as_ref())?,
                name: definition.name,
                version: definition.version,
                sequence: definition.sequence,
                init_required: definition.init_required,
                endorsement_plugin: definition.endorsement_plugin,
                validation_plugin: definition.validation_plugin,
                approvals: BTreeMap::new(),
            })
        })
        .collect()
}

/// Decodes `CheckCommitReadinessResult`.
pub fn decode_commit_readiness_result(bytes: &[u8]) -> Result<CommitReadiness, LifecycleError> {
    let result: CheckCommitReadinessResult = decode_message(
        Operation::CheckCommitReadiness,
        "CheckCommitReadinessResult",
        bytes,
    )?;
    Ok(CommitReadiness {
        approvals: result.approvals,
    })
}
