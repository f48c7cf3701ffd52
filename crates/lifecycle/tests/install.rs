// Path: crates/lifecycle/tests/install.rs

use hlf_lifecycle::{install_chaincode, ChaincodeSource, PackageOptions, PackagedChaincode};
use hlf_proto::lifecycle::InstallChaincodeArgs;
use hlf_proto::Message;
use hlf_test_utils::fixtures::{functions, install_result};
use hlf_test_utils::{assert_err, assert_ok, MockPackager, MockPeer, MockSigner, TestNetwork};
use hlf_types::{LifecycleConfig, LifecycleError, Operation, TransportError};
use std::time::Duration;

const LABEL: &str = "basic_1.0";

async fn packaged() -> PackagedChaincode {
    let options = PackageOptions::new("/src/basic", "node", LABEL);
    assert_ok!(
        ChaincodeSource::new("basic", "1.0")
            .package(&options, &MockPackager::new(), &LifecycleConfig::default())
            .await
    )
}

fn network_answering(ids: &[(&str, &str)]) -> TestNetwork {
    let names: Vec<&str> = ids.iter().map(|(peer, _)| *peer).collect();
    let network = TestNetwork::new(&names);
    for (peer, package_id) in ids {
        network
            .peer(peer)
            .unwrap()
            .respond(functions::INSTALL, install_result(LABEL, package_id));
    }
    network
}

#[tokio::test]
async fn agreeing_peers_yield_the_shared_package_id() {
    let network = network_answering(&[
        ("peer0", "basic_1.0:abc123"),
        ("peer1", "basic_1.0:abc123"),
        ("peer2", "basic_1.0:abc123"),
    ]);
    let installed = assert_ok!(
        install_chaincode(packaged().await, &["peer0", "peer1", "peer2"], &network.context, None)
            .await
    );
    assert_eq!(installed.package_id(), Some("basic_1.0:abc123"));
    assert_eq!(installed.label(), LABEL);
    assert!(installed.archive().is_some());
    for peer in &network.peers {
        assert_eq!(peer.requests().len(), 1);
    }
}

#[tokio::test]
async fn disagreeing_package_ids_name_both() {
    let network = network_answering(&[("peer0", "abc123"), ("peer1", "xyz999")]);
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0", "peer1"], &network.context, None).await
    );
    match err {
        LifecycleError::PackageIdMismatch { first, second } => {
            let mut ids = vec![first, second];
            ids.sort();
            assert_eq!(ids, vec!["abc123".to_string(), "xyz999".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn one_divergent_peer_among_many_fails() {
    for odd in 0..4 {
        let ids: Vec<(String, &str)> = (0..4)
            .map(|i| (format!("peer{}", i), if i == odd { "other" } else { "same" }))
            .collect();
        let borrowed: Vec<(&str, &str)> = ids.iter().map(|(p, id)| (p.as_str(), *id)).collect();
        let network = network_answering(&borrowed);
        let names: Vec<&str> = borrowed.iter().map(|(p, _)| *p).collect();
        let err = assert_err!(
            install_chaincode(packaged().await, &names, &network.context, None).await
        );
        assert!(matches!(err, LifecycleError::PackageIdMismatch { .. }), "{:?}", err);
    }
}

#[tokio::test]
async fn label_disagreement_is_a_consistency_error() {
    let network = TestNetwork::new(&["peer0", "peer1"]);
    network
        .peer("peer0")
        .unwrap()
        .respond(functions::INSTALL, install_result(LABEL, "id"));
    network
        .peer("peer1")
        .unwrap()
        .respond(functions::INSTALL, install_result("basic_2.0", "id"));
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0", "peer1"], &network.context, None).await
    );
    assert_eq!(
        err,
        LifecycleError::LabelMismatch {
            peer: "peer1".to_string(),
            expected: LABEL.to_string(),
            got: "basic_2.0".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_peer_set_is_rejected() {
    let network = TestNetwork::new(&["peer0"]);
    let none: [&str; 0] = [];
    let err = assert_err!(install_chaincode(packaged().await, &none, &network.context, None).await);
    assert_eq!(err, LifecycleError::NoPeers(Operation::Install));
    assert!(network.peers[0].requests().is_empty());
}

#[tokio::test]
async fn unknown_peer_fails_before_anything_is_sent() {
    let network = network_answering(&[("peer0", "id"), ("peer1", "id")]);
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0", "peer1", "peer9"], &network.context, None)
            .await
    );
    assert_eq!(err, LifecycleError::PeerNotFound("peer9".to_string()));
    assert!(network.peers.iter().all(|peer| peer.requests().is_empty()));
}

#[tokio::test]
async fn disconnected_peer_fails_before_anything_is_sent() {
    let peers = vec![MockPeer::new("peer0"), MockPeer::disconnected("peer1")];
    peers[0].respond(functions::INSTALL, install_result(LABEL, "id"));
    let network = TestNetwork::with_peers("mychannel", peers, MockSigner::new("Org1MSP"));
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0", "peer1"], &network.context, None).await
    );
    assert_eq!(err, LifecycleError::PeerDisconnected("peer1".to_string()));
    assert!(network.peers[0].requests().is_empty());
}

#[tokio::test]
async fn transport_error_fails_the_install() {
    let network = network_answering(&[("peer0", "id"), ("peer1", "id")]);
    network.peer("peer1").unwrap().fail(
        functions::INSTALL,
        TransportError::Timeout(Duration::from_secs(30)),
    );
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0", "peer1"], &network.context, None).await
    );
    match err {
        LifecycleError::PeerFailure { stage, peer, message } => {
            assert_eq!(stage, Operation::Install);
            assert_eq!(peer, "peer1");
            assert!(message.contains("timed out"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn non_success_status_fails_the_install() {
    let network = network_answering(&[("peer0", "id")]);
    network.peer("peer0").unwrap().respond_status(
        functions::INSTALL,
        500,
        "chaincode already successfully installed",
    );
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0"], &network.context, None).await
    );
    assert_eq!(
        err,
        LifecycleError::BadStatus {
            stage: Operation::Install,
            peer: "peer0".to_string(),
            status: 500,
            message: "chaincode already successfully installed".to_string(),
        }
    );
}

#[tokio::test]
async fn install_request_is_peer_local_and_carries_the_archive() {
    let network = network_answering(&[("peer0", "id")]).with_config(LifecycleConfig {
        default_timeout_ms: Some(1_500),
        ..Default::default()
    });
    let packaged = packaged().await;
    let archive = packaged.archive().to_vec();
    assert_ok!(install_chaincode(packaged, &["peer0"], &network.context, None).await);

    let received = network.peers[0].received();
    assert_eq!(received.len(), 1);
    let (proposal, timeout) = &received[0];
    assert_eq!(proposal.request.channel, None);
    assert_eq!(proposal.request.chaincode, "_lifecycle");
    assert_eq!(proposal.request.function, "InstallChaincode");
    assert!(!proposal.signature.is_empty());
    assert_eq!(*timeout, Some(Duration::from_millis(1_500)));

    let args = InstallChaincodeArgs::decode(proposal.request.arg().unwrap()).unwrap();
    assert_eq!(args.chaincode_install_package, archive);
}

#[tokio::test]
async fn explicit_timeout_overrides_the_configured_default() {
    let network = network_answering(&[("peer0", "id")]).with_config(LifecycleConfig {
        default_timeout_ms: Some(1_500),
        ..Default::default()
    });
    assert_ok!(
        packaged()
            .await
            .install(&["peer0"], &network.context, Some(Duration::from_secs(9)))
            .await
    );
    assert_eq!(network.peers[0].received()[0].1, Some(Duration::from_secs(9)));
}

#[tokio::test]
async fn signing_failure_sends_nothing() {
    let peers = vec![MockPeer::new("peer0")];
    peers[0].respond(functions::INSTALL, install_result(LABEL, "id"));
    let network = TestNetwork::with_peers("mychannel", peers, MockSigner::failing("Org1MSP"));
    let err = assert_err!(
        install_chaincode(packaged().await, &["peer0"], &network.context, None).await
    );
    assert!(matches!(
        err,
        LifecycleError::Signing {
            stage: Operation::Install,
            ..
        }
    ));
    assert!(network.peers[0].requests().is_empty());
}

#[tokio::test]
async fn duplicate_peer_names_install_once() {
    let network = network_answering(&[("peer0", "id")]);
    assert_ok!(
        install_chaincode(packaged().await, &["peer0", "peer0"], &network.context, None).await
    );
    assert_eq!(network.peers[0].requests().len(), 1);
}
