//! Payload builders for peer results and a ready-made test network.

use crate::mocks::{MockPeer, MockSigner, MockTransactor, MockTransport};
use hlf_api::context::NetworkContext;
use hlf_proto::lifecycle::{
    query_chaincode_definitions_result, query_installed_chaincodes_result,
    CheckCommitReadinessResult, GetInstalledChaincodePackageResult, InstallChaincodeResult,
    QueryChaincodeDefinitionResult, QueryChaincodeDefinitionsResult,
    QueryInstalledChaincodeResult, QueryInstalledChaincodesResult,
};
use hlf_types::LifecycleConfig;
use prost::Message;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The `_lifecycle` function names peers are scripted by.
pub mod functions {
    /// Install a package.
    pub const INSTALL: &str = "InstallChaincode";
    /// Query one installed package.
    pub const QUERY_INSTALLED: &str = "QueryInstalledChaincode";
    /// Query every installed package.
    pub const QUERY_ALL_INSTALLED: &str = "QueryInstalledChaincodes";
    /// Fetch an installed package's archive.
    pub const GET_INSTALLED_PACKAGE: &str = "GetInstalledChaincodePackage";
    /// Query one committed definition.
    pub const QUERY_DEFINED: &str = "QueryChaincodeDefinition";
    /// Query every committed definition.
    pub const QUERY_ALL_DEFINED: &str = "QueryChaincodeDefinitions";
    /// Check commit readiness.
    pub const CHECK_COMMIT_READINESS: &str = "CheckCommitReadiness";
}

/// An `InstallChaincodeResult` payload.
pub fn install_result(label: &str, package_id: &str) -> Vec<u8> {
    InstallChaincodeResult {
        package_id: package_id.to_string(),
        label: label.to_string(),
    }
    .encode_to_vec()
}

/// A `QueryInstalledChaincodeResult` payload with no channel references.
pub fn installed_result(label: &str, package_id: &str) -> Vec<u8> {
    QueryInstalledChaincodeResult {
        package_id: package_id.to_string(),
        label: label.to_string(),
        references: BTreeMap::new(),
    }
    .encode_to_vec()
}

/// One package in a `QueryInstalledChaincodesResult`, with its references as
/// `(channel, [(name, version)])`.
pub fn installed_package(
    label: &str,
    package_id: &str,
    references: &[(&str, &[(&str, &str)])],
) -> query_installed_chaincodes_result::InstalledChaincode {
    query_installed_chaincodes_result::InstalledChaincode {
        package_id: package_id.to_string(),
        label: label.to_string(),
        references: references
            .iter()
            .map(|(channel, chaincodes)| {
                (
                    channel.to_string(),
                    query_installed_chaincodes_result::References {
                        chaincodes: chaincodes
                            .iter()
                            .map(|(name, version)| query_installed_chaincodes_result::Chaincode {
                                name: name.to_string(),
                                version: version.to_string(),
                            })
                            .collect(),
                    },
                )
            })
            .collect(),
    }
}

/// A `QueryInstalledChaincodesResult` payload.
pub fn all_installed_result(
    packages: Vec<query_installed_chaincodes_result::InstalledChaincode>,
) -> Vec<u8> {
    QueryInstalledChaincodesResult {
        installed_chaincodes: packages,
    }
    .encode_to_vec()
}

/// A `GetInstalledChaincodePackageResult` payload.
pub fn installed_package_result(archive: &[u8]) -> Vec<u8> {
    GetInstalledChaincodePackageResult {
        chaincode_install_package: archive.to_vec(),
    }
    .encode_to_vec()
}

/// A `QueryChaincodeDefinitionResult` payload with default plugins.
pub fn defined_result(
    version: &str,
    sequence: i64,
    validation_parameter: Vec<u8>,
    approvals: &[(&str, bool)],
) -> Vec<u8> {
    QueryChaincodeDefinitionResult {
        sequence,
        version: version.to_string(),
        endorsement_plugin: "escc".to_string(),
        validation_plugin: "vscc".to_string(),
        validation_parameter,
        collections: None,
        init_required: false,
        approvals: approvals
            .iter()
            .map(|(org, approved)| (org.to_string(), *approved))
            .collect(),
    }
    .encode_to_vec()
}

/// A `QueryChaincodeDefinitionsResult` payload of `(name, version, sequence)`.
pub fn defined_list_result(definitions: &[(&str, &str, i64)]) -> Vec<u8> {
    QueryChaincodeDefinitionsResult {
        chaincode_definitions: definitions
            .iter()
            .map(
                |(name, version, sequence)| query_chaincode_definitions_result::ChaincodeDefinition {
                    name: name.to_string(),
                    sequence: *sequence,
                    version: version.to_string(),
                    endorsement_plugin: "escc".to_string(),
                    validation_plugin: "vscc".to_string(),
                    validation_parameter: Vec::new(),
                    collections: None,
                    init_required: false,
                },
            )
            .collect(),
    }
    .encode_to_vec()
}

/// A `CheckCommitReadinessResult` payload.
pub fn readiness_result(approvals: &[(&str, bool)]) -> Vec<u8> {
    CheckCommitReadinessResult {
        approvals: approvals
            .iter()
            .map(|(org, approved)| (org.to_string(), *approved))
            .collect(),
    }
    .encode_to_vec()
}

/// A channel, a set of mock peers, a signer and a recording transactor.
pub struct TestNetwork {
    /// The context handed to lifecycle calls.
    pub context: NetworkContext,
    /// The peers the transport can resolve, in creation order.
    pub peers: Vec<Arc<MockPeer>>,
    /// The transactor approvals and commits go to.
    pub transactor: Arc<MockTransactor>,
}

impl TestNetwork {
    /// `mychannel`, signed by `Org1MSP`, with connected peers of the given names.
    pub fn new(peer_names: &[&str]) -> Self {
        let peers: Vec<Arc<MockPeer>> = peer_names.iter().map(|name| MockPeer::new(*name)).collect();
        Self::with_peers("mychannel", peers, MockSigner::new("Org1MSP"))
    }

    /// A network over explicit peers and signer.
    pub fn with_peers(channel: &str, peers: Vec<Arc<MockPeer>>, signer: MockSigner) -> Self {
        let transactor = MockTransactor::new();
        let context = NetworkContext::new(
            channel,
            Arc::new(MockTransport::new(peers.iter().cloned())),
            Arc::new(signer),
            transactor.clone(),
        );
        Self {
            context,
            peers,
            transactor,
        }
    }

    /// Replaces the context's configuration.
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.context = self.context.with_config(config);
        self
    }

    /// The peer with the given name.
    pub fn peer(&self, name: &str) -> Option<&Arc<MockPeer>> {
        use hlf_api::transport::PeerHandle;
        self.peers.iter().find(|peer| peer.name() == name)
    }
}
