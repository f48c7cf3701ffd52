// Path: crates/types/src/policy/mod.rs

//! Endorsement policy definitions.
//!
//! A policy reaches a peer in one of three mutually exclusive encodings: a
//! reference to a policy in the channel configuration, a signature policy
//! built from MSP principals and `n`-of-`m` combinators, or bytes the caller
//! already serialized. [`SignaturePolicySpec`] follows the JSON object format
//! used by Fabric client SDKs:
//!
//! ```json
//! {
//!   "identities": [
//!     { "role": { "name": "member", "mspId": "Org1MSP" } },
//!     { "role": { "name": "member", "mspId": "Org2MSP" } }
//!   ],
//!   "policy": { "1-of": [ { "signed-by": 0 }, { "signed-by": 1 } ] }
//! }
//! ```
//!
//! The same structure can be produced from the CLI expression language with
//! [`SignaturePolicySpec::from_expression`].

mod expression;

use crate::error::LifecycleError;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The three encodings an endorsement policy can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndorsementPolicy {
    /// The name of a policy defined in the channel configuration,
    /// e.g. `/Channel/Application/Endorsement`.
    ChannelConfigReference(String),
    /// A signature policy over MSP principals.
    Signature(SignaturePolicySpec),
    /// An already serialized `ApplicationPolicy`, passed through untouched.
    Raw(Vec<u8>),
}

impl EndorsementPolicy {
    /// A reference to a channel configuration policy.
    pub fn channel_reference(path: impl Into<String>) -> Self {
        Self::ChannelConfigReference(path.into())
    }

    /// Parses a signature policy from the expression language,
    /// e.g. `AND('Org1MSP.member', 'Org2MSP.member')`.
    pub fn from_expression(expr: &str) -> Result<Self, LifecycleError> {
        SignaturePolicySpec::from_expression(expr).map(Self::Signature)
    }
}

impl From<SignaturePolicySpec> for EndorsementPolicy {
    fn from(spec: SignaturePolicySpec) -> Self {
        Self::Signature(spec)
    }
}

impl From<Vec<u8>> for EndorsementPolicy {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

/// MSP roles a principal can be scoped to. Discriminants follow `MSPRole.MSPRoleType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MspRole {
    /// Any member of the organization.
    Member,
    /// An administrator of the organization.
    Admin,
    /// A client identity.
    Client,
    /// A peer identity.
    Peer,
    /// An orderer identity.
    Orderer,
}

impl MspRole {
    /// The wire value of the role.
    pub fn code(self) -> i32 {
        match self {
            Self::Member => 0,
            Self::Admin => 1,
            Self::Client => 2,
            Self::Peer => 3,
            Self::Orderer => 4,
        }
    }

    /// Maps a wire value back to a role.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Member),
            1 => Some(Self::Admin),
            2 => Some(Self::Client),
            3 => Some(Self::Peer),
            4 => Some(Self::Orderer),
            _ => None,
        }
    }

    /// The lowercase role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Client => "client",
            Self::Peer => "peer",
            Self::Orderer => "orderer",
        }
    }
}

impl fmt::Display for MspRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MspRole {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "client" => Ok(Self::Client),
            "peer" => Ok(Self::Peer),
            "orderer" => Ok(Self::Orderer),
            _ => Err(LifecycleError::InvalidPolicy(format!(
                "unknown role '{}'; expected member, admin, client, peer or orderer",
                s
            ))),
        }
    }
}

/// An MSP principal scoped to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePrincipal {
    /// The role within the organization.
    pub name: MspRole,
    /// The organization's MSP ID.
    #[serde(rename = "mspId")]
    pub msp_id: String,
}

/// One entry of a signature policy's identity table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyIdentity {
    /// The role principal.
    pub role: RolePrincipal,
}

impl PolicyIdentity {
    /// Creates a role principal for an organization.
    pub fn new(msp_id: impl Into<String>, role: MspRole) -> Self {
        Self {
            role: RolePrincipal {
                name: role,
                msp_id: msp_id.into(),
            },
        }
    }
}

/// A node of a signature policy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRule {
    /// Satisfied by a signature from the identity at this index.
    SignedBy(u32),
    /// Satisfied when at least `n` of `rules` are satisfied.
    NOutOf {
        /// The threshold.
        n: u32,
        /// The sub-rules.
        rules: Vec<PolicyRule>,
    },
}

impl PolicyRule {
    fn validate(&self, identity_count: usize) -> Result<(), LifecycleError> {
        match self {
            Self::SignedBy(index) => {
                if *index as usize >= identity_count {
                    return Err(LifecycleError::InvalidPolicy(format!(
                        "signed-by index {} is out of range; the policy declares {} identities",
                        index, identity_count
                    )));
                }
                Ok(())
            }
            Self::NOutOf { n, rules } => {
                if rules.is_empty() {
                    return Err(LifecycleError::InvalidPolicy(format!(
                        "'{}-of' rule has no sub-rules",
                        n
                    )));
                }
                if *n == 0 || *n as usize > rules.len() {
                    return Err(LifecycleError::InvalidPolicy(format!(
                        "'{}-of' rule must require between 1 and {} signatures",
                        n,
                        rules.len()
                    )));
                }
                rules.iter().try_for_each(|r| r.validate(identity_count))
            }
        }
    }
}

impl Serialize for PolicyRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::SignedBy(index) => map.serialize_entry("signed-by", index)?,
            Self::NOutOf { n, rules } => map.serialize_entry(&format!("{}-of", n), rules)?,
        }
        map.end()
    }
}

struct PolicyRuleVisitor;

impl<'de> Visitor<'de> for PolicyRuleVisitor {
    type Value = PolicyRule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with a single \"signed-by\" or \"<n>-of\" key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PolicyRule, A::Error> {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::custom("empty policy rule"))?;
        let rule = if key == "signed-by" {
            PolicyRule::SignedBy(map.next_value()?)
        } else if let Some(n) = key.strip_suffix("-of").and_then(|n| n.parse::<u32>().ok()) {
            PolicyRule::NOutOf {
                n,
                rules: map.next_value()?,
            }
        } else {
            return Err(de::Error::custom(format!(
                "unrecognised policy rule '{}'",
                key
            )));
        };
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("a policy rule must have exactly one key"));
        }
        Ok(rule)
    }
}

impl<'de> Deserialize<'de> for PolicyRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PolicyRuleVisitor)
    }
}

/// A signature policy: an identity table and a rule tree indexing into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicySpec {
    /// The principals referenced by `signed-by` rules.
    pub identities: Vec<PolicyIdentity>,
    /// The root rule.
    pub policy: PolicyRule,
}

impl SignaturePolicySpec {
    /// Parses the CLI policy expression language.
    ///
    /// Supports `AND(..)`, `OR(..)` and `OutOf(n, ..)` with arbitrary nesting over
    /// quoted `'MSPID.role'` principals. Repeated principals share one identity.
    pub fn from_expression(expr: &str) -> Result<Self, LifecycleError> {
        expression::parse(expr)
    }

    /// Parses the JSON object format.
    pub fn from_json(json: &str) -> Result<Self, LifecycleError> {
        let spec: Self = serde_json::from_str(json)
            .map_err(|e| LifecycleError::InvalidPolicy(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that the policy can be satisfied as written: identities are
    /// present, every index resolves, and every threshold is attainable.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.identities.is_empty() {
            return Err(LifecycleError::InvalidPolicy(
                "policy declares no identities".to_string(),
            ));
        }
        if let Some(pos) = self
            .identities
            .iter()
            .position(|id| id.role.msp_id.trim().is_empty())
        {
            return Err(LifecycleError::InvalidPolicy(format!(
                "identity {} has an empty MSP ID",
                pos
            )));
        }
        self.policy.validate(self.identities.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_org_spec() -> SignaturePolicySpec {
        SignaturePolicySpec {
            identities: vec![
                PolicyIdentity::new("Org1MSP", MspRole::Member),
                PolicyIdentity::new("Org2MSP", MspRole::Member),
            ],
            policy: PolicyRule::NOutOf {
                n: 1,
                rules: vec![PolicyRule::SignedBy(0), PolicyRule::SignedBy(1)],
            },
        }
    }

    #[test]
    fn json_format_round_trips() {
        let json = r#"{
            "identities": [
                { "role": { "name": "member", "mspId": "Org1MSP" } },
                { "role": { "name": "member", "mspId": "Org2MSP" } }
            ],
            "policy": { "1-of": [ { "signed-by": 0 }, { "signed-by": 1 } ] }
        }"#;
        let spec = SignaturePolicySpec::from_json(json).unwrap();
        assert_eq!(spec, two_org_spec());

        let back = serde_json::to_string(&spec).unwrap();
        assert_eq!(SignaturePolicySpec::from_json(&back).unwrap(), spec);
    }

    #[test]
    fn unknown_rule_key_is_rejected() {
        let json = r#"{
            "identities": [ { "role": { "name": "member", "mspId": "Org1MSP" } } ],
            "policy": { "some-of": [ { "signed-by": 0 } ] }
        }"#;
        let err = SignaturePolicySpec::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unrecognised policy rule 'some-of'"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let json = r#"{
            "identities": [ { "role": { "name": "banker", "mspId": "Org1MSP" } } ],
            "policy": { "signed-by": 0 }
        }"#;
        assert!(matches!(
            SignaturePolicySpec::from_json(json),
            Err(LifecycleError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn out_of_range_index_fails_fast() {
        let mut spec = two_org_spec();
        spec.policy = PolicyRule::SignedBy(2);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("signed-by index 2 is out of range"));
    }

    #[test]
    fn unattainable_threshold_fails_fast() {
        let mut spec = two_org_spec();
        spec.policy = PolicyRule::NOutOf {
            n: 3,
            rules: vec![PolicyRule::SignedBy(0), PolicyRule::SignedBy(1)],
        };
        assert!(spec.validate().is_err());

        spec.policy = PolicyRule::NOutOf {
            n: 1,
            rules: vec![],
        };
        assert!(spec.validate().unwrap_err().to_string().contains("no sub-rules"));
    }

    #[test]
    fn empty_identity_table_fails_fast() {
        let spec = SignaturePolicySpec {
            identities: vec![],
            policy: PolicyRule::SignedBy(0),
        };
        assert_eq!(
            spec.validate().unwrap_err(),
            LifecycleError::InvalidPolicy("policy declares no identities".to_string())
        );
    }

    #[test]
    fn role_codes_match_wire_numbering() {
        for role in [
            MspRole::Member,
            MspRole::Admin,
            MspRole::Client,
            MspRole::Peer,
            MspRole::Orderer,
        ] {
            assert_eq!(MspRole::from_code(role.code()), Some(role));
        }
        assert_eq!(MspRole::from_code(9), None);
        assert_eq!(MspRole::Admin.code(), 1);
    }
}
