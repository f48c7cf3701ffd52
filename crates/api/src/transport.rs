// Path: crates/api/src/transport.rs

use async_trait::async_trait;
use hlf_types::error::TransportError;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// A proposal addressed to a system chaincode, before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndorsementRequest {
    /// The channel the proposal is scoped to; `None` for peer-local operations.
    pub channel: Option<String>,
    /// The chaincode namespace, normally `_lifecycle`.
    pub chaincode: String,
    /// The function to invoke.
    pub function: String,
    /// Serialized arguments following the function name.
    pub args: Vec<Vec<u8>>,
}

impl EndorsementRequest {
    /// A channel-agnostic request, as used for peer-local operations.
    pub fn system(
        namespace: impl Into<String>,
        function: impl Into<String>,
        arg: Vec<u8>,
    ) -> Self {
        Self {
            channel: None,
            chaincode: namespace.into(),
            function: function.into(),
            args: vec![arg],
        }
    }

    /// A request evaluated against one channel's state.
    pub fn on_channel(
        channel: impl Into<String>,
        namespace: impl Into<String>,
        function: impl Into<String>,
        arg: Vec<u8>,
    ) -> Self {
        Self {
            channel: Some(channel.into()),
            ..Self::system(namespace, function, arg)
        }
    }

    /// The first serialized argument, which carries the lifecycle message.
    pub fn arg(&self) -> Option<&[u8]> {
        self.args.first().map(Vec::as_slice)
    }
}

/// A request together with the signature produced by a `SigningContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedProposal {
    /// The signed request.
    pub request: EndorsementRequest,
    /// The opaque signature over the serialized proposal.
    pub signature: Vec<u8>,
}

/// One peer's answer to a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProposalResponse {
    /// The name of the peer that answered.
    pub peer: String,
    /// HTTP-like status code.
    pub status: i32,
    /// Status message, populated on failure.
    pub message: String,
    /// The serialized lifecycle result.
    pub payload: Vec<u8>,
}

impl ProposalResponse {
    /// A 200 response carrying a payload.
    pub fn ok(peer: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            peer: peer.into(),
            status: 200,
            message: String::new(),
            payload,
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A connected endorsing peer.
#[async_trait]
pub trait PeerHandle: Send + Sync + Debug {
    /// The logical name the peer was resolved from.
    fn name(&self) -> &str;

    /// Whether the peer's connection is currently usable.
    async fn check_connection(&self) -> bool;

    /// Delivers a signed proposal and waits for the peer's response.
    ///
    /// `timeout` is a budget for this single round trip; expiry is reported as
    /// [`TransportError::Timeout`] and is never retried here.
    async fn send_signed(
        &self,
        proposal: &SignedProposal,
        timeout: Option<Duration>,
    ) -> Result<ProposalResponse, TransportError>;
}

/// Maps logical peer names to connected handles.
pub trait PeerTransport: Send + Sync {
    /// Looks up a peer by name.
    fn resolve(&self, peer_name: &str) -> Option<Arc<dyn PeerHandle>>;
}
