// Path: crates/lifecycle/tests/approve_commit.rs

use hlf_lifecycle::codec::decode_policy;
use hlf_lifecycle::{
    approve_chaincode, commit_chaincode, ApprovalOptions, ChaincodeSource, ChaincodeStage,
    CommitOptions, InstalledChaincode, PackageOptions,
};
use hlf_proto::lifecycle::{
    chaincode_source, ApproveChaincodeDefinitionForMyOrgArgs, CommitChaincodeDefinitionArgs,
};
use hlf_proto::Message;
use hlf_test_utils::fixtures::{functions, install_result};
use hlf_test_utils::{assert_err, assert_ok, MockPackager, MockPeer, MockSigner, TestNetwork};
use hlf_types::{
    ChaincodeIdentity, CollectionDefinition, EndorsementPolicy, InstalledChannelChaincode,
    LifecycleConfig, LifecycleError, Operation, PolicyIdentity, PolicyRule, SignaturePolicySpec,
    MspRole, TransportError,
};
use std::time::Duration;

fn unavailable() -> InstalledChaincode {
    InstalledChaincode::unavailable(ChaincodeIdentity::new("basic", "1.0"), "basic_1.0")
}

fn approve_args(network: &TestNetwork, index: usize) -> ApproveChaincodeDefinitionForMyOrgArgs {
    let submission = &network.transactor.submissions()[index];
    ApproveChaincodeDefinitionForMyOrgArgs::decode(submission.request.arg().unwrap()).unwrap()
}

#[tokio::test]
async fn approving_unavailable_package_uses_the_unavailable_source() {
    let network = TestNetwork::new(&["peer0"]);
    let record = InstalledChannelChaincode {
        label: "basic_1.0".to_string(),
        package_id: String::new(),
        ..Default::default()
    };
    let installed =
        InstalledChaincode::from_peer_record(ChaincodeIdentity::new("basic", "1.0"), &record);

    assert_ok!(approve_chaincode(installed, ApprovalOptions::new(1), &network.context).await);
    let args = approve_args(&network, 0);
    assert!(matches!(
        args.source.and_then(|s| s.r#type),
        Some(chaincode_source::Type::Unavailable(_))
    ));
}

#[tokio::test]
async fn approving_installed_package_references_it() {
    let network = TestNetwork::new(&["peer0"]);
    network
        .peer("peer0")
        .unwrap()
        .respond(functions::INSTALL, install_result("basic_1.0", "basic_1.0:abc"));
    let packaged = assert_ok!(
        ChaincodeSource::new("basic", "1.0")
            .package(
                &PackageOptions::new("/src/basic", "java", "basic_1.0"),
                &MockPackager::new(),
                &LifecycleConfig::default(),
            )
            .await
    );
    let installed = assert_ok!(packaged.install(&["peer0"], &network.context, None).await);
    let approved = assert_ok!(installed.approve(ApprovalOptions::new(1), &network.context).await);

    assert_eq!(approved.package_id(), Some("basic_1.0:abc"));
    let args = approve_args(&network, 0);
    match args.source.and_then(|s| s.r#type) {
        Some(chaincode_source::Type::LocalPackage(local)) => {
            assert_eq!(local.package_id, "basic_1.0:abc")
        }
        other => panic!("unexpected source: {:?}", other),
    }
}

#[tokio::test]
async fn approval_is_a_channel_transaction_with_the_full_definition() {
    let network = TestNetwork::new(&["peer0"]);
    let policy = EndorsementPolicy::from_expression("AND('Org1MSP.peer', 'Org2MSP.peer')").unwrap();
    let collections = CollectionDefinition::parse_json(
        r#"[{ "name": "private", "policy": "OR('Org1MSP.member')", "maxPeerCount": 1 }]"#,
    )
    .unwrap();
    let options = ApprovalOptions::new(5_000_000_000)
        .with_endorsement_policy(policy.clone())
        .with_collections(collections.clone())
        .with_init_required(true)
        .with_timeout(Duration::from_secs(20));

    let approved = assert_ok!(approve_chaincode(unavailable(), options, &network.context).await);
    assert!(!approved.is_committed());
    assert_eq!(approved.sequence(), 5_000_000_000);
    assert_eq!(approved.endorsement_policy(), Some(&policy));
    assert_eq!(approved.collections(), Some(collections.as_slice()));
    assert_eq!(approved.init_required(), Some(true));

    let submissions = network.transactor.submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.request.channel.as_deref(), Some("mychannel"));
    assert_eq!(submission.request.chaincode, "_lifecycle");
    assert_eq!(submission.request.function, "ApproveChaincodeDefinitionForMyOrg");
    assert_eq!(submission.timeout, Some(Duration::from_secs(20)));

    let args = approve_args(&network, 0);
    assert_eq!(args.sequence, 5_000_000_000);
    assert_eq!(args.name, "basic");
    assert_eq!(args.version, "1.0");
    assert!(args.init_required);
    assert!(args.endorsement_plugin.is_empty());
    assert_eq!(args.collections.unwrap().config.len(), 1);
    assert_eq!(
        decode_policy(Operation::Approve, &args.validation_parameter).unwrap(),
        Some(policy)
    );
}

#[tokio::test]
async fn empty_peer_names_defer_to_the_channel_default() {
    let network = TestNetwork::new(&["peer0"]);
    assert_ok!(approve_chaincode(unavailable(), ApprovalOptions::new(1), &network.context).await);
    assert!(network.transactor.submissions()[0].endorsers.is_empty());
    assert!(network.peers[0].requests().is_empty());
}

#[tokio::test]
async fn explicit_endorsers_are_resolved_first() {
    use hlf_api::transport::PeerHandle;

    let network = TestNetwork::new(&["peer0", "peer1"]);
    let options = ApprovalOptions::new(1).with_peers(["peer1", "peer0"]);
    assert_ok!(approve_chaincode(unavailable(), options, &network.context).await);
    let endorsers: Vec<String> = network.transactor.submissions()[0]
        .endorsers
        .iter()
        .map(|peer| peer.name().to_string())
        .collect();
    assert_eq!(endorsers, vec!["peer1".to_string(), "peer0".to_string()]);

    let err = assert_err!(
        approve_chaincode(
            unavailable(),
            ApprovalOptions::new(2).with_peers(["peer0", "peer7"]),
            &network.context,
        )
        .await
    );
    assert_eq!(err, LifecycleError::PeerNotFound("peer7".to_string()));
    assert_eq!(network.transactor.submissions().len(), 1);
}

#[tokio::test]
async fn disconnected_endorser_blocks_the_approval() {
    let network = TestNetwork::with_peers(
        "mychannel",
        vec![MockPeer::disconnected("peer0")],
        MockSigner::new("Org1MSP"),
    );
    let err = assert_err!(
        approve_chaincode(
            unavailable(),
            ApprovalOptions::new(1).with_peers(["peer0"]),
            &network.context,
        )
        .await
    );
    assert_eq!(err, LifecycleError::PeerDisconnected("peer0".to_string()));
    assert!(network.transactor.submissions().is_empty());
}

#[tokio::test]
async fn malformed_policy_fails_before_submission() {
    let network = TestNetwork::new(&[]);
    let bad = SignaturePolicySpec {
        identities: vec![PolicyIdentity::new("Org1MSP", MspRole::Member)],
        policy: PolicyRule::NOutOf {
            n: 2,
            rules: vec![PolicyRule::SignedBy(0)],
        },
    };
    let err = assert_err!(
        approve_chaincode(
            unavailable(),
            ApprovalOptions::new(1).with_endorsement_policy(bad.into()),
            &network.context,
        )
        .await
    );
    assert!(matches!(err, LifecycleError::InvalidPolicy(_)));
    assert!(err.is_configuration());
    assert!(network.transactor.submissions().is_empty());
}

#[tokio::test]
async fn rejected_approval_is_a_submission_error() {
    let network = TestNetwork::new(&[]);
    network
        .transactor
        .fail_with(Some(TransportError::Rejected("ENDORSEMENT_POLICY_FAILURE".into())));
    let err = assert_err!(
        approve_chaincode(unavailable(), ApprovalOptions::new(1), &network.context).await
    );
    assert_eq!(
        err,
        LifecycleError::Submission {
            stage: Operation::Approve,
            message: "ENDORSEMENT_POLICY_FAILURE".to_string(),
        }
    );
}

#[tokio::test]
async fn commit_sets_committed_only_on_success() {
    let network = TestNetwork::new(&["peer0"]);
    let mut approved = assert_ok!(
        approve_chaincode(unavailable(), ApprovalOptions::new(3), &network.context).await
    );
    assert!(!approved.is_committed());

    network
        .transactor
        .fail_with(Some(TransportError::Timeout(Duration::from_secs(60))));
    let err = assert_err!(
        commit_chaincode(&mut approved, CommitOptions::default(), &network.context).await
    );
    assert!(matches!(
        err,
        LifecycleError::Submission {
            stage: Operation::Commit,
            ..
        }
    ));
    assert!(!approved.is_committed());

    network.transactor.fail_with(None);
    assert_ok!(approved.commit(CommitOptions::with_peers(["peer0"]), &network.context).await);
    assert!(approved.is_committed());
}

#[tokio::test]
async fn commit_encodes_the_approved_definition() {
    let network = TestNetwork::new(&[]);
    let policy = EndorsementPolicy::channel_reference("/Channel/Application/Endorsement");
    let mut approved = assert_ok!(
        approve_chaincode(
            unavailable(),
            ApprovalOptions::new(7).with_endorsement_policy(policy.clone()),
            &network.context,
        )
        .await
    );
    assert_ok!(approved.commit(CommitOptions::default(), &network.context).await);

    let submissions = network.transactor.submissions();
    assert_eq!(submissions.len(), 2);
    let commit = &submissions[1];
    assert_eq!(commit.request.function, "CommitChaincodeDefinition");
    assert_eq!(commit.request.channel.as_deref(), Some("mychannel"));
    assert!(commit.endorsers.is_empty());

    let args = CommitChaincodeDefinitionArgs::decode(commit.request.arg().unwrap()).unwrap();
    assert_eq!(args.sequence, 7);
    assert_eq!(args.name, approved.name());
    assert_eq!(args.version, approved.version());
    assert_eq!(
        decode_policy(Operation::Commit, &args.validation_parameter).unwrap(),
        Some(policy)
    );
}
