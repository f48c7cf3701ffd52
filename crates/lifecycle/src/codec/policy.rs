// Path: crates/lifecycle/src/codec/policy.rs

//! Compiles endorsement policies and collection definitions into their
//! protobuf form, and reads them back from query results.

use hlf_proto::common::{signature_policy, SignaturePolicy, SignaturePolicyEnvelope};
use hlf_proto::msp::{msp_principal::Classification, MspPrincipal, MspRole as ProtoMspRole};
use hlf_proto::peer::{
    application_policy, collection_config, collection_policy_config, ApplicationPolicy,
    CollectionConfig, CollectionConfigPackage, CollectionPolicyConfig, StaticCollectionConfig,
};
use hlf_types::collection::validate_collections;
use hlf_types::error::{LifecycleError, Operation};
use hlf_types::{
    CollectionDefinition, CollectionEndorsementPolicy, CollectionMemberPolicy, EndorsementPolicy,
    MspRole, PolicyIdentity, PolicyRule, SignaturePolicySpec,
};
use prost::Message;

/// Serializes an endorsement policy as an `ApplicationPolicy`.
///
/// - A channel reference becomes the `channel_config_policy_reference` variant.
/// - A signature policy is validated and compiled to a `SignaturePolicyEnvelope`.
/// - Raw bytes are returned unchanged.
pub fn encode_policy(policy: &EndorsementPolicy) -> Result<Vec<u8>, LifecycleError> {
    match policy {
        EndorsementPolicy::Raw(bytes) => Ok(bytes.clone()),
        other => application_policy(other).map(|p| p.encode_to_vec()),
    }
}

/// Parses a serialized `ApplicationPolicy` back into a policy.
///
/// Empty bytes mean no policy was set. Policies that use principals other than
/// MSP roles are returned as [`EndorsementPolicy::Raw`].
pub fn decode_policy(
    stage: Operation,
    bytes: &[u8],
) -> Result<Option<EndorsementPolicy>, LifecycleError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let decoded = ApplicationPolicy::decode(bytes).map_err(|e| LifecycleError::Decode {
        stage,
        what: "ApplicationPolicy",
        reason: e.to_string(),
    })?;
    let policy = match decoded.r#type {
        Some(application_policy::Type::ChannelConfigPolicyReference(path)) => {
            EndorsementPolicy::ChannelConfigReference(path)
        }
        Some(application_policy::Type::SignaturePolicy(envelope)) => {
            match decompile_envelope(stage, &envelope)? {
                Some(spec) => EndorsementPolicy::Signature(spec),
                None => EndorsementPolicy::Raw(bytes.to_vec()),
            }
        }
        None => EndorsementPolicy::Raw(bytes.to_vec()),
    };
    Ok(Some(policy))
}

pub(crate) fn application_policy(
    policy: &EndorsementPolicy,
) -> Result<ApplicationPolicy, LifecycleError> {
    let policy_type = match policy {
        EndorsementPolicy::ChannelConfigReference(path) => {
            if path.trim().is_empty() {
                return Err(LifecycleError::InvalidPolicy(
                    "channel config policy reference must not be empty".to_string(),
                ));
            }
            application_policy::Type::ChannelConfigPolicyReference(path.clone())
        }
        EndorsementPolicy::Signature(spec) => {
            application_policy::Type::SignaturePolicy(signature_envelope(spec)?)
        }
        EndorsementPolicy::Raw(bytes) => {
            return ApplicationPolicy::decode(bytes.as_slice())
                .map_err(|e| LifecycleError::InvalidPolicy(format!("raw policy: {}", e)))
        }
    };
    Ok(ApplicationPolicy {
        r#type: Some(policy_type),
    })
}

/// Compiles a signature policy. Every identity becomes a `ROLE` principal.
pub(crate) fn signature_envelope(
    spec: &SignaturePolicySpec,
) -> Result<SignaturePolicyEnvelope, LifecycleError> {
    spec.validate()?;
    let identities = spec
        .identities
        .iter()
        .map(|identity| MspPrincipal {
            principal_classification: Classification::Role as i32,
            principal: ProtoMspRole {
                msp_identifier: identity.role.msp_id.clone(),
                role: identity.role.name.code(),
            }
            .encode_to_vec(),
        })
        .collect();
    Ok(SignaturePolicyEnvelope {
        version: 0,
        rule: Some(compile_rule(&spec.policy)?),
        identities,
    })
}

fn compile_rule(rule: &PolicyRule) -> Result<SignaturePolicy, LifecycleError> {
    let out_of_range =
        |value: u32| LifecycleError::InvalidPolicy(format!("value {} does not fit in int32", value));
    let rule_type = match rule {
        PolicyRule::SignedBy(index) => signature_policy::Type::SignedBy(
            i32::try_from(*index).map_err(|_| out_of_range(*index))?,
        ),
        PolicyRule::NOutOf { n, rules } => signature_policy::Type::NOutOf(signature_policy::NOutOf {
            n: i32::try_from(*n).map_err(|_| out_of_range(*n))?,
            rules: rules.iter().map(compile_rule).collect::<Result<_, _>>()?,
        }),
    };
    Ok(SignaturePolicy {
        r#type: Some(rule_type),
    })
}

/// Reads a signature envelope back. `Ok(None)` when the envelope cannot be
/// expressed as a [`SignaturePolicySpec`] (non-role principals, unknown roles,
/// negative indices or an empty rule).
fn decompile_envelope(
    stage: Operation,
    envelope: &SignaturePolicyEnvelope,
) -> Result<Option<SignaturePolicySpec>, LifecycleError> {
    let mut identities = Vec::with_capacity(envelope.identities.len());
    for principal in &envelope.identities {
        if principal.principal_classification != Classification::Role as i32 {
            return Ok(None);
        }
        let role = ProtoMspRole::decode(principal.principal.as_slice()).map_err(|e| {
            LifecycleError::Decode {
                stage,
                what: "MSPRole",
                reason: e.to_string(),
            }
        })?;
        let Some(name) = MspRole::from_code(role.role) else {
            return Ok(None);
        };
        identities.push(PolicyIdentity::new(role.msp_identifier, name));
    }
    let policy = envelope.rule.as_ref().and_then(decompile_rule);
    Ok(policy.map(|policy| SignaturePolicySpec { identities, policy }))
}

fn decompile_rule(rule: &SignaturePolicy) -> Option<PolicyRule> {
    match rule.r#type.as_ref()? {
        signature_policy::Type::SignedBy(index) => {
            u32::try_from(*index).ok().map(PolicyRule::SignedBy)
        }
        signature_policy::Type::NOutOf(n_out_of) => Some(PolicyRule::NOutOf {
            n: u32::try_from(n_out_of.n).ok()?,
            rules: n_out_of
                .rules
                .iter()
                .map(decompile_rule)
                .collect::<Option<_>>()?,
        }),
    }
}

/// Validates the collections and compiles them into a `CollectionConfigPackage`.
pub fn encode_collections(
    collections: &[CollectionDefinition],
) -> Result<CollectionConfigPackage, LifecycleError> {
    validate_collections(collections)?;
    let config = collections
        .iter()
        .map(|collection| -> Result<CollectionConfig, LifecycleError> {
            let endorsement_policy = collection
                .endorsement_policy
                .clone()
                .map(|p| application_policy(&EndorsementPolicy::from(p)))
                .transpose()?;
            let member_envelope = match &collection.policy {
                CollectionMemberPolicy::Signature(spec) => signature_envelope(spec)?,
                CollectionMemberPolicy::Raw(bytes) => {
                    SignaturePolicyEnvelope::decode(bytes.as_slice()).map_err(|e| {
                        LifecycleError::InvalidCollectionConfig(format!(
                            "collection '{}': raw member policy: {}",
                            collection.name, e
                        ))
                    })?
                }
            };
            Ok(CollectionConfig {
                payload: Some(collection_config::Payload::StaticCollectionConfig(
                    StaticCollectionConfig {
                        name: collection.name.clone(),
                        member_orgs_policy: Some(CollectionPolicyConfig {
                            payload: Some(collection_policy_config::Payload::SignaturePolicy(
                                member_envelope,
                            )),
                        }),
                        required_peer_count: collection.required_peer_count,
                        maximum_peer_count: collection.max_peer_count,
                        block_to_live: collection.block_to_live,
                        member_only_read: collection.member_only_read,
                        member_only_write: collection.member_only_write,
                        endorsement_policy,
                    },
                )),
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(CollectionConfigPackage { config })
}

/// Reads collection definitions back from a query result.
pub fn decode_collections(
    stage: Operation,
    package: Option<&CollectionConfigPackage>,
) -> Result<Vec<CollectionDefinition>, LifecycleError> {
    let Some(package) = package else {
        return Ok(Vec::new());
    };
    let mut collections = Vec::with_capacity(package.config.len());
    for config in &package.config {
        let Some(collection_config::Payload::StaticCollectionConfig(static_config)) =
            &config.payload
        else {
            return Err(LifecycleError::Decode {
                stage,
                what: "CollectionConfigPackage",
                reason: "collection config without a static payload".to_string(),
            });
        };
        let member_envelope = match static_config
            .member_orgs_policy
            .as_ref()
            .and_then(|p| p.payload.as_ref())
        {
            Some(collection_policy_config::Payload::SignaturePolicy(envelope)) => envelope,
            None => {
                return Err(LifecycleError::Decode {
                    stage,
                    what: "CollectionConfigPackage",
                    reason: format!("collection '{}' has no member policy", static_config.name),
                })
            }
        };
        let policy = match decompile_envelope(stage, member_envelope)? {
            Some(spec) => CollectionMemberPolicy::Signature(spec),
            None => CollectionMemberPolicy::Raw(member_envelope.encode_to_vec()),
        };
        let endorsement_policy = match &static_config.endorsement_policy {
            None => None,
            Some(application) => match &application.r#type {
                None => None,
                Some(application_policy::Type::ChannelConfigPolicyReference(path)) => {
                    Some(CollectionEndorsementPolicy::ChannelConfigPolicy(path.clone()))
                }
                Some(application_policy::Type::SignaturePolicy(envelope)) => {
                    Some(match decompile_envelope(stage, envelope)? {
                        Some(spec) => CollectionEndorsementPolicy::SignaturePolicy(spec),
                        None => CollectionEndorsementPolicy::Raw(application.encode_to_vec()),
                    })
                }
            },
        };
        collections.push(CollectionDefinition {
            name: static_config.name.clone(),
            policy,
            required_peer_count: static_config.required_peer_count,
            max_peer_count: static_config.maximum_peer_count,
            block_to_live: static_config.block_to_live,
            member_only_read: static_config.member_only_read,
            member_only_write: static_config.member_only_write,
            endorsement_policy,
        });
    }
    Ok(collections)
}
