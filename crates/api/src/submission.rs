// Path: crates/api/src/submission.rs

use crate::transport::{EndorsementRequest, PeerHandle};
use async_trait::async_trait;
use hlf_types::error::TransportError;
use std::sync::Arc;
use std::time::Duration;

/// An ordered channel transaction: endorse, order, and wait for the commit.
#[derive(Debug, Clone)]
pub struct TransactionSubmission {
    /// The unsigned request; the transactor signs with its own identity.
    pub request: EndorsementRequest,
    /// Explicit endorsers. Empty means the channel's default endorsement
    /// policy selects them.
    pub endorsers: Vec<Arc<dyn PeerHandle>>,
    /// Budget for the whole submission.
    pub timeout: Option<Duration>,
}

/// Submits transactions through the ordering service.
#[async_trait]
pub trait ChannelTransactor: Send + Sync {
    /// Submits a transaction and resolves once it is committed, returning the
    /// chaincode's result payload.
    async fn submit(&self, submission: TransactionSubmission) -> Result<Vec<u8>, TransportError>;
}
