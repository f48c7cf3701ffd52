// Path: crates/lifecycle/src/operations/install.rs

use super::{lifecycle_function, observe};
use crate::codec::{self, InstallResult};
use crate::entities::{ChaincodeStage, InstalledChaincode, PackagedChaincode};
use crate::gateway::{resolve_endorsers, send_endorsement};
use hlf_api::context::NetworkContext;
use hlf_api::transport::{EndorsementRequest, ProposalResponse};
use hlf_telemetry::{lifecycle_metrics, Timer};
use hlf_types::error::{LifecycleError, Operation};
use std::time::Duration;

/// Installs a package on every named peer and returns it with the package ID
/// the peers agreed on.
///
/// The request is peer-local (no channel). Every peer must answer, report the
/// label that was packaged, and compute the same package ID.
pub async fn install_chaincode<S: AsRef<str>>(
    packaged: PackagedChaincode,
    peer_names: &[S],
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<InstalledChaincode, LifecycleError> {
    let stage = Operation::Install;
    let _timer = Timer::new(lifecycle_metrics(), stage.as_str());
    observe(stage, install_inner(packaged, peer_names, context, timeout).await)
}

async fn install_inner<S: AsRef<str>>(
    packaged: PackagedChaincode,
    peer_names: &[S],
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<InstalledChaincode, LifecycleError> {
    let stage = Operation::Install;
    let endorsers = resolve_endorsers(stage, peer_names, context.transport.as_ref()).await?;

    tracing::info!(
        target: "lifecycle",
        chaincode = %packaged.identity(),
        label = packaged.label(),
        peers = endorsers.len(),
        "installing chaincode"
    );

    let request = EndorsementRequest::system(
        &context.config.namespace,
        lifecycle_function(stage)?,
        codec::encode_install_args(packaged.archive()),
    );
    let responses = send_endorsement(
        stage,
        request,
        &endorsers,
        context.signer.as_ref(),
        context.config.effective_timeout(timeout),
    )
    .await?
    .into_endorsed(stage)?;
    lifecycle_metrics().inc_peer_responses(stage.as_str(), responses.len() as u64);

    let package_id = agreed_package_id(packaged.label(), &responses)?;
    tracing::info!(
        target: "lifecycle",
        chaincode = %packaged.identity(),
        package_id = %package_id,
        "chaincode installed"
    );
    Ok(InstalledChaincode::from_install(packaged, package_id))
}

/// Every response must carry the requested label and one shared package ID.
fn agreed_package_id(
    label: &str,
    responses: &[ProposalResponse],
) -> Result<String, LifecycleError> {
    let mut agreed: Option<String> = None;
    for response in responses {
        let InstallResult {
            package_id,
            label: got,
        } = codec::decode_install_result(&response.payload)?;
        if got != label {
            return Err(LifecycleError::LabelMismatch {
                peer: response.peer.clone(),
                expected: label.to_string(),
                got,
            });
        }
        let first = agreed.get_or_insert_with(|| package_id.clone());
        if *first != package_id {
            return Err(LifecycleError::PackageIdMismatch {
                first: first.clone(),
                second: package_id,
            });
        }
    }
    agreed.ok_or(LifecycleError::NoResponse { stage: Operation::Install })
}
