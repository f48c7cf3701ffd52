//! Scripted implementations of the lifecycle collaborator traits.
//!
//! Every mock records what it was asked to do so tests can assert on the
//! requests the engine built.

use async_trait::async_trait;
use hlf_api::packaging::PackagingUtility;
use hlf_api::signing::SigningContext;
use hlf_api::submission::{ChannelTransactor, TransactionSubmission};
use hlf_api::transport::{
    EndorsementRequest, PeerHandle, PeerTransport, ProposalResponse, SignedProposal,
};
use hlf_types::error::TransportError;
use hlf_types::ChaincodeType;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A peer that answers each lifecycle function with a scripted outcome.
///
/// Functions without a script are rejected.
#[derive(Debug)]
pub struct MockPeer {
    name: String,
    connected: AtomicBool,
    scripts: Mutex<HashMap<String, Result<ProposalResponse, TransportError>>>,
    received: Mutex<Vec<(SignedProposal, Option<Duration>)>>,
}

impl MockPeer {
    /// A connected peer with no scripted responses.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            connected: AtomicBool::new(true),
            scripts: Mutex::new(HashMap::new()),
            received: Mutex::new(Vec::new()),
        })
    }

    /// A peer whose connectivity check fails.
    pub fn disconnected(name: impl Into<String>) -> Arc<Self> {
        let peer = Self::new(name);
        peer.set_connected(false);
        peer
    }

    /// Changes the connectivity check result.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Answers `function` with status 200 and `payload`.
    pub fn respond(&self, function: &str, payload: Vec<u8>) {
        let response = ProposalResponse::ok(self.name.clone(), payload);
        lock(&self.scripts).insert(function.to_string(), Ok(response));
    }

    /// Answers `function` with a non-success status.
    pub fn respond_status(&self, function: &str, status: i32, message: &str) {
        let response = ProposalResponse {
            peer: self.name.clone(),
            status,
            message: message.to_string(),
            payload: Vec::new(),
        };
        lock(&self.scripts).insert(function.to_string(), Ok(response));
    }

    /// Fails `function` at the transport level.
    pub fn fail(&self, function: &str, err: TransportError) {
        lock(&self.scripts).insert(function.to_string(), Err(err));
    }

    /// The proposals this peer received, with the timeout each was sent with.
    pub fn received(&self) -> Vec<(SignedProposal, Option<Duration>)> {
        lock(&self.received).clone()
    }

    /// The requests this peer received.
    pub fn requests(&self) -> Vec<EndorsementRequest> {
        lock(&self.received)
            .iter()
            .map(|(proposal, _)| proposal.request.clone())
            .collect()
    }
}

#[async_trait]
impl PeerHandle for MockPeer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_connection(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_signed(
        &self,
        proposal: &SignedProposal,
        timeout: Option<Duration>,
    ) -> Result<ProposalResponse, TransportError> {
        lock(&self.received).push((proposal.clone(), timeout));
        let function = proposal.request.function.as_str();
        lock(&self.scripts)
            .get(function)
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Rejected(format!(
                    "{}: no response scripted for {}",
                    self.name, function
                )))
            })
    }
}

/// Resolves names to a fixed set of [`MockPeer`]s.
#[derive(Debug, Default)]
pub struct MockTransport {
    peers: HashMap<String, Arc<MockPeer>>,
}

impl MockTransport {
    /// A transport that knows exactly `peers`.
    pub fn new(peers: impl IntoIterator<Item = Arc<MockPeer>>) -> Self {
        Self {
            peers: peers
                .into_iter()
                .map(|peer| (peer.name.clone(), peer))
                .collect(),
        }
    }
}

impl PeerTransport for MockTransport {
    fn resolve(&self, peer_name: &str) -> Option<Arc<dyn PeerHandle>> {
        self.peers
            .get(peer_name)
            .map(|peer| Arc::clone(peer) as Arc<dyn PeerHandle>)
    }
}

/// Signs by tagging the request with the MSP ID.
#[derive(Debug)]
pub struct MockSigner {
    msp_id: String,
    fail: bool,
}

impl MockSigner {
    /// A signer for `msp_id`.
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            fail: false,
        }
    }

    /// A signer whose every signature attempt fails.
    pub fn failing(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            fail: true,
        }
    }
}

impl SigningContext for MockSigner {
    fn msp_id(&self) -> &str {
        &self.msp_id
    }

    fn sign(&self, request: EndorsementRequest) -> Result<SignedProposal, TransportError> {
        if self.fail {
            return Err(TransportError::Signing(format!(
                "no signing key for {}",
                self.msp_id
            )));
        }
        let signature = format!("{}:{}", self.msp_id, hex::encode(request.function.as_bytes()));
        Ok(SignedProposal {
            request,
            signature: signature.into_bytes(),
        })
    }
}

/// Records submissions and accepts them, or fails them all.
#[derive(Debug, Default)]
pub struct MockTransactor {
    submissions: Mutex<Vec<TransactionSubmission>>,
    failure: Mutex<Option<TransportError>>,
}

impl MockTransactor {
    /// A transactor that accepts every submission.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every later submission fail with `err`; `None` accepts again.
    pub fn fail_with(&self, err: Option<TransportError>) {
        *lock(&self.failure) = err;
    }

    /// Every submission seen so far, accepted or not.
    pub fn submissions(&self) -> Vec<TransactionSubmission> {
        lock(&self.submissions).clone()
    }
}

#[async_trait]
impl ChannelTransactor for MockTransactor {
    async fn submit(&self, submission: TransactionSubmission) -> Result<Vec<u8>, TransportError> {
        lock(&self.submissions).push(submission);
        match lock(&self.failure).clone() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

/// One call made to [`MockPackager::package_contract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCall {
    /// The source path.
    pub source_path: PathBuf,
    /// The chaincode type.
    pub chaincode_type: ChaincodeType,
    /// The metadata directory, if any.
    pub metadata_path: Option<PathBuf>,
    /// The Go path, if any.
    pub go_path: Option<PathBuf>,
}

/// A packager that builds a recognisable fake archive.
///
/// The archive is `label`, a NUL separator, then `code:<source path>`.
#[derive(Debug, Default)]
pub struct MockPackager {
    calls: Mutex<Vec<PackageCall>>,
    fail: bool,
}

impl MockPackager {
    /// A packager that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A packager whose archive step always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every `package_contract` call made so far.
    pub fn calls(&self) -> Vec<PackageCall> {
        lock(&self.calls).clone()
    }

    /// The archive this packager produces for a label and source path.
    pub fn expected_archive(label: &str, source_path: &Path) -> Vec<u8> {
        let mut archive = label.as_bytes().to_vec();
        archive.push(0);
        archive.extend_from_slice(format!("code:{}", source_path.display()).as_bytes());
        archive
    }
}

#[async_trait]
impl PackagingUtility for MockPackager {
    async fn package_contract(
        &self,
        source_path: &Path,
        chaincode_type: ChaincodeType,
        metadata_path: Option<&Path>,
        go_path: Option<&Path>,
    ) -> anyhow::Result<Vec<u8>> {
        lock(&self.calls).push(PackageCall {
            source_path: source_path.to_path_buf(),
            chaincode_type,
            metadata_path: metadata_path.map(Path::to_path_buf),
            go_path: go_path.map(Path::to_path_buf),
        });
        if self.fail {
            anyhow::bail!("no such directory: {}", source_path.display());
        }
        Ok(format!("code:{}", source_path.display()).into_bytes())
    }

    async fn final_package(
        &self,
        label: &str,
        _chaincode_type: ChaincodeType,
        code_package: Vec<u8>,
        _source_path: &Path,
    ) -> anyhow::Result<Vec<u8>> {
        let mut archive = label.as_bytes().to_vec();
        archive.push(0);
        archive.extend(code_package);
        Ok(archive)
    }
}
