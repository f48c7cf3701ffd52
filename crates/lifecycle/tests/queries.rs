// Path: crates/lifecycle/tests/queries.rs

use hlf_lifecycle::codec::encode_policy;
use hlf_lifecycle::{
    query_all_installed_chaincodes, query_commit_readiness, query_defined_chaincode,
    query_defined_chaincodes, query_installed_chaincode, query_installed_chaincode_package_file,
};
use hlf_proto::lifecycle::{CheckCommitReadinessArgs, QueryChaincodeDefinitionArgs};
use hlf_proto::Message;
use hlf_test_utils::fixtures::{
    all_installed_result, defined_list_result, defined_result, functions, installed_package,
    installed_package_result, installed_result, readiness_result,
};
use hlf_test_utils::{assert_err, assert_ok, TestNetwork};
use hlf_types::{
    ChaincodeDefinition, ChaincodeIdentity, EndorsementPolicy, InstalledChannelChaincode,
    LifecycleConfig, LifecycleError, Operation,
};
use std::time::Duration;

#[tokio::test]
async fn package_without_references_yields_one_channelless_record() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(
        functions::QUERY_ALL_INSTALLED,
        all_installed_result(vec![installed_package("basic_1.0", "basic_1.0:abc", &[])]),
    );
    let records = assert_ok!(query_all_installed_chaincodes("peer0", &network.context, None).await);
    assert_eq!(
        records,
        vec![InstalledChannelChaincode {
            channel_name: String::new(),
            name: String::new(),
            version: String::new(),
            package_id: "basic_1.0:abc".to_string(),
            label: "basic_1.0".to_string(),
        }]
    );
}

#[tokio::test]
async fn references_are_flattened_per_channel_and_chaincode() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(
        functions::QUERY_ALL_INSTALLED,
        all_installed_result(vec![
            installed_package(
                "basic_1.0",
                "basic_1.0:abc",
                &[
                    ("alpha", &[("basic", "1.0")]),
                    ("beta", &[("basic", "1.0"), ("basic-fork", "2.0")]),
                ],
            ),
            installed_package("idle_1", "idle_1:fff", &[]),
        ]),
    );
    let records = assert_ok!(query_all_installed_chaincodes("peer0", &network.context, None).await);
    let summary: Vec<(&str, &str, &str)> = records
        .iter()
        .map(|r| (r.channel_name.as_str(), r.name.as_str(), r.package_id.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("alpha", "basic", "basic_1.0:abc"),
            ("beta", "basic", "basic_1.0:abc"),
            ("beta", "basic-fork", "basic_1.0:abc"),
            ("", "", "idle_1:fff"),
        ]
    );
}

#[tokio::test]
async fn installed_queries_are_not_channel_scoped() {
    let network = TestNetwork::new(&["peer0"]);
    let peer = &network.peers[0];
    peer.respond(
        functions::QUERY_INSTALLED,
        installed_result("basic_1.0", "basic_1.0:abc"),
    );
    peer.respond(functions::GET_INSTALLED_PACKAGE, installed_package_result(b"archive"));

    let records = assert_ok!(query_installed_chaincode("peer0", "basic_1.0:abc", &network.context, None).await);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, "basic_1.0");
    assert!(records[0].channel_name.is_empty());

    let archive = assert_ok!(
        query_installed_chaincode_package_file("peer0", "basic_1.0:abc", &network.context, None).await
    );
    assert_eq!(archive, b"archive".to_vec());

    let requests = peer.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.channel.is_none()));
    assert_eq!(requests[0].function, "QueryInstalledChaincode");
    assert_eq!(requests[1].function, "GetInstalledChaincodePackage");
}

#[tokio::test]
async fn defined_chaincode_decodes_policy_and_approvals() {
    let network = TestNetwork::new(&["peer0"]);
    let policy = EndorsementPolicy::from_expression("OR('Org1MSP.member', 'Org2MSP.member')").unwrap();
    network.peers[0].respond(
        functions::QUERY_DEFINED,
        defined_result(
            "1.0",
            4,
            encode_policy(&policy).unwrap(),
            &[("Org1MSP", true), ("Org2MSP", false)],
        ),
    );

    let defined = assert_ok!(query_defined_chaincode("peer0", "basic", &network.context, None).await);
    assert_eq!(defined.name, "basic");
    assert_eq!(defined.version, "1.0");
    assert_eq!(defined.sequence, 4);
    assert_eq!(defined.endorsement_policy, Some(policy));
    assert!(defined.collections.is_empty());
    assert_eq!(defined.endorsement_plugin, "escc");
    assert_eq!(defined.approvals.get("Org1MSP"), Some(&true));
    assert_eq!(defined.approvals.get("Org2MSP"), Some(&false));

    let request = &network.peers[0].requests()[0];
    assert_eq!(request.channel.as_deref(), Some("mychannel"));
    let args = QueryChaincodeDefinitionArgs::decode(request.arg().unwrap()).unwrap();
    assert_eq!(args.name, "basic");
}

#[tokio::test]
async fn defined_chaincode_without_policy_reports_none() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(functions::QUERY_DEFINED, defined_result("2.0", 1, Vec::new(), &[]));
    let defined = assert_ok!(query_defined_chaincode("peer0", "basic", &network.context, None).await);
    assert_eq!(defined.endorsement_policy, None);
    assert!(defined.approvals.is_empty());
}

#[tokio::test]
async fn defined_chaincodes_list_every_definition() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(
        functions::QUERY_ALL_DEFINED,
        defined_list_result(&[("basic", "1.0", 1), ("marbles", "3.1", 6_000_000_000)]),
    );
    let defined = assert_ok!(query_defined_chaincodes("peer0", &network.context, None).await);
    let summary: Vec<(&str, i64)> = defined
        .iter()
        .map(|d| (d.name.as_str(), d.sequence))
        .collect();
    assert_eq!(summary, vec![("basic", 1), ("marbles", 6_000_000_000)]);
    assert!(defined.iter().all(|d| d.approvals.is_empty()));
    assert_eq!(
        network.peers[0].requests()[0].channel.as_deref(),
        Some("mychannel")
    );
}

#[tokio::test]
async fn commit_readiness_fills_default_plugins() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(
        functions::CHECK_COMMIT_READINESS,
        readiness_result(&[("Org1MSP", true), ("Org2MSP", false)]),
    );
    let definition = ChaincodeDefinition::new(&ChaincodeIdentity::new("basic", "1.0"), 2);

    let readiness = assert_ok!(query_commit_readiness("peer0", &definition, &network.context, None).await);
    assert!(readiness.is_approved_by("Org1MSP"));
    assert!(!readiness.is_approved_by("Org2MSP"));
    assert_eq!(readiness.pending().collect::<Vec<_>>(), vec!["Org2MSP"]);

    let request = &network.peers[0].requests()[0];
    assert_eq!(request.channel.as_deref(), Some("mychannel"));
    let args = CheckCommitReadinessArgs::decode(request.arg().unwrap()).unwrap();
    assert_eq!(args.sequence, 2);
    assert_eq!(args.endorsement_plugin, "escc");
    assert_eq!(args.validation_plugin, "vscc");
}

#[tokio::test]
async fn commit_readiness_respects_configured_and_explicit_plugins() {
    let network = TestNetwork::new(&["peer0"]).with_config(LifecycleConfig {
        default_endorsement_plugin: "custom-escc".to_string(),
        ..Default::default()
    });
    network.peers[0].respond(functions::CHECK_COMMIT_READINESS, readiness_result(&[]));
    let mut definition = ChaincodeDefinition::new(&ChaincodeIdentity::new("basic", "1.0"), 1);
    definition.validation_plugin = Some("custom-vscc".to_string());

    assert_ok!(query_commit_readiness("peer0", &definition, &network.context, None).await);
    let request = &network.peers[0].requests()[0];
    let args = CheckCommitReadinessArgs::decode(request.arg().unwrap()).unwrap();
    assert_eq!(args.endorsement_plugin, "custom-escc");
    assert_eq!(args.validation_plugin, "custom-vscc");
    assert_eq!(definition.endorsement_plugin, None);
}

#[tokio::test]
async fn queries_go_to_exactly_the_named_peer() {
    let network = TestNetwork::new(&["peer0", "peer1"]);
    network.peers[1].respond(
        functions::QUERY_ALL_INSTALLED,
        all_installed_result(Vec::new()),
    );
    let records = assert_ok!(query_all_installed_chaincodes("peer1", &network.context, None).await);
    assert!(records.is_empty());
    assert!(network.peers[0].requests().is_empty());
    assert_eq!(network.peers[1].requests().len(), 1);
}

#[tokio::test]
async fn unknown_peer_is_reported() {
    let network = TestNetwork::new(&["peer0"]);
    let err = assert_err!(query_defined_chaincodes("peer3", &network.context, None).await);
    assert_eq!(err, LifecycleError::PeerNotFound("peer3".to_string()));
}

#[tokio::test]
async fn peer_error_status_is_reported() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond_status(
        functions::QUERY_DEFINED,
        404,
        "namespace basic is not defined",
    );
    let err = assert_err!(query_defined_chaincode("peer0", "basic", &network.context, None).await);
    assert_eq!(
        err,
        LifecycleError::BadStatus {
            stage: Operation::QueryDefined,
            peer: "peer0".to_string(),
            status: 404,
            message: "namespace basic is not defined".to_string(),
        }
    );
}

#[tokio::test]
async fn undecodable_payload_is_a_decode_error() {
    let network = TestNetwork::new(&["peer0"]);
    network.peers[0].respond(functions::CHECK_COMMIT_READINESS, vec![0xff, 0xff, 0xff]);
    let definition = ChaincodeDefinition::new(&ChaincodeIdentity::new("basic", "1.0"), 1);
    let err = assert_err!(query_commit_readiness("peer0", &definition, &network.context, None).await);
    assert!(matches!(
        err,
        LifecycleError::Decode {
            stage: Operation::CheckCommitReadiness,
            ..
        }
    ));
}

#[tokio::test]
async fn query_timeout_reaches_the_peer() {
    let network = TestNetwork::new(&["peer0"]).with_config(LifecycleConfig {
        default_timeout_ms: Some(1_500),
        ..Default::default()
    });
    network.peers[0].respond(functions::QUERY_ALL_DEFINED, defined_list_result(&[]));

    assert_ok!(query_defined_chaincodes("peer0", &network.context, None).await);
    assert_ok!(
        query_defined_chaincodes("peer0", &network.context, Some(Duration::from_secs(7))).await
    );

    let timeouts: Vec<Option<Duration>> = network.peers[0]
        .received()
        .into_iter()
        .map(|(_, timeout)| timeout)
        .collect();
    assert_eq!(
        timeouts,
        vec![Some(Duration::from_millis(1_500)), Some(Duration::from_secs(7))]
    );
}
