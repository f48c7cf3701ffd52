// Path: crates/lifecycle/src/gateway.rs

//! Endorser resolution and proposal fan-out.
//!
//! Resolution completes for every requested peer before any request is sent, so
//! a typo in the last peer name never leaves the first peers half-installed.

use futures::future::join_all;
use hlf_api::signing::SigningContext;
use hlf_api::transport::{EndorsementRequest, PeerHandle, PeerTransport, ProposalResponse};
use hlf_types::error::{LifecycleError, Operation, TransportError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Resolves peer names to connected handles, in the order given.
///
/// Duplicate names are resolved once. Fails with [`LifecycleError::NoPeers`]
/// for an empty list, [`LifecycleError::PeerNotFound`] for an unknown name and
/// [`LifecycleError::PeerDisconnected`] when a connectivity check fails.
pub async fn resolve_endorsers<S: AsRef<str>>(
    stage: Operation,
    peer_names: &[S],
    transport: &dyn PeerTransport,
) -> Result<Vec<Arc<dyn PeerHandle>>, LifecycleError> {
    if peer_names.is_empty() {
        return Err(LifecycleError::NoPeers(stage));
    }
    let mut seen = HashSet::new();
    let mut handles = Vec::with_capacity(peer_names.len());
    for name in peer_names.iter().map(AsRef::as_ref) {
        if !seen.insert(name) {
            tracing::debug!(target: "lifecycle", %stage, peer = name, "ignoring duplicate peer name");
            continue;
        }
        let handle = transport
            .resolve(name)
            .ok_or_else(|| LifecycleError::PeerNotFound(name.to_string()))?;
        handles.push(handle);
    }

    let connected = join_all(handles.iter().map(|handle| handle.check_connection())).await;
    if let Some((handle, _)) = handles
        .iter()
        .zip(connected)
        .find(|(_, connected)| !*connected)
    {
        return Err(LifecycleError::PeerDisconnected(handle.name().to_string()));
    }
    Ok(handles)
}

/// Resolves the single peer a query is evaluated on.
pub async fn resolve_endorser(
    stage: Operation,
    peer_name: &str,
    transport: &dyn PeerTransport,
) -> Result<Arc<dyn PeerHandle>, LifecycleError> {
    let mut handles = resolve_endorsers(stage, &[peer_name], transport).await?;
    handles.pop().ok_or(LifecycleError::NoPeers(stage))
}

/// What came back from a fan-out, in target order.
#[derive(Debug, Default)]
pub struct EndorsementResponseSet {
    /// Responses from peers that answered.
    pub responses: Vec<ProposalResponse>,
    /// Peers whose request failed before producing a response.
    pub errors: Vec<(String, TransportError)>,
}

impl EndorsementResponseSet {
    /// Enforces the fan-out outcome rules:
    ///
    /// 1. any transport error fails the stage, reporting the first one;
    /// 2. no responses at all fails the stage;
    /// 3. any non-2xx response fails the stage, reporting the first one.
    pub fn into_endorsed(self, stage: Operation) -> Result<Vec<ProposalResponse>, LifecycleError> {
        if let Some((peer, err)) = self.errors.first() {
            return Err(LifecycleError::peer_failure(stage, peer.clone(), err));
        }
        if self.responses.is_empty() {
            return Err(LifecycleError::NoResponse { stage });
        }
        if let Some(bad) = self.responses.iter().find(|r| !r.is_success()) {
            return Err(LifecycleError::BadStatus {
                stage,
                peer: bad.peer.clone(),
                status: bad.status,
                message: bad.message.clone(),
            });
        }
        Ok(self.responses)
    }
}

/// Signs `request` once and sends it to every target concurrently.
///
/// Outcomes are collected for every target before returning; nothing is
/// retried. Signing failures abort before any request is sent.
pub async fn send_endorsement(
    stage: Operation,
    request: EndorsementRequest,
    targets: &[Arc<dyn PeerHandle>],
    signer: &dyn SigningContext,
    timeout: Option<Duration>,
) -> Result<EndorsementResponseSet, LifecycleError> {
    let signed = signer
        .sign(request)
        .map_err(|e| LifecycleError::Signing {
            stage,
            message: e.to_string(),
        })?;
    tracing::debug!(
        target: "lifecycle",
        %stage,
        function = %signed.request.function,
        targets = targets.len(),
        "sending endorsement request"
    );

    let outcomes = join_all(targets.iter().map(|peer| {
        let signed = &signed;
        async move { (peer.name(), peer.send_signed(signed, timeout).await) }
    }))
    .await;

    let mut set = EndorsementResponseSet::default();
    for (peer, outcome) in outcomes {
        match outcome {
            Ok(mut response) => {
                if response.peer.is_empty() {
                    response.peer = peer.to_string();
                }
                set.responses.push(response);
            }
            Err(err) => {
                tracing::warn!(target: "lifecycle", %stage, peer, error = %err, "peer request failed");
                set.errors.push((peer.to_string(), err));
            }
        }
    }
    Ok(set)
}
