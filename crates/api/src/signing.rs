// Path: crates/api/src/signing.rs

use crate::transport::{EndorsementRequest, SignedProposal};
use hlf_types::error::TransportError;

/// The caller's organizational identity. The engine never sees key material.
pub trait SigningContext: Send + Sync {
    /// The MSP ID of the signing organization.
    fn msp_id(&self) -> &str;

    /// Serializes and signs a request.
    fn sign(&self, request: EndorsementRequest) -> Result<SignedProposal, TransportError>;
}
