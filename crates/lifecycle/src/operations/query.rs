// Path: crates/lifecycle/src/operations/query.rs

//! Read-only queries. Each one is evaluated on exactly one peer, waiting at
//! most `timeout` (or the configured default) for its answer.

use super::{lifecycle_function, observe};
use crate::codec::{self, QueryArgs};
use crate::gateway::{resolve_endorser, send_endorsement};
use hlf_api::context::NetworkContext;
use hlf_api::transport::EndorsementRequest;
use hlf_telemetry::{lifecycle_metrics, Timer};
use hlf_types::error::LifecycleError;
use hlf_types::{ChaincodeDefinition, CommitReadiness, DefinedChaincode, InstalledChannelChaincode};
use std::slice;
use std::time::Duration;

/// Sends one query to one peer and returns the response payload.
async fn evaluate(
    peer_name: &str,
    query: QueryArgs<'_>,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, LifecycleError> {
    let stage = query.operation();
    let peer = resolve_endorser(stage, peer_name, context.transport.as_ref()).await?;
    let arg = codec::encode_query_args(&query)?;
    let function = lifecycle_function(stage)?;
    let namespace = &context.config.namespace;
    let request = if query.is_channel_scoped() {
        EndorsementRequest::on_channel(&context.channel_name, namespace, function, arg)
    } else {
        EndorsementRequest::system(namespace, function, arg)
    };
    tracing::debug!(target: "lifecycle", %stage, peer = peer_name, "evaluating lifecycle query");

    let responses = send_endorsement(
        stage,
        request,
        slice::from_ref(&peer),
        context.signer.as_ref(),
        context.config.effective_timeout(timeout),
    )
    .await?
    .into_endorsed(stage)?;
    lifecycle_metrics().inc_peer_responses(stage.as_str(), responses.len() as u64);
    responses
        .into_iter()
        .next()
        .map(|response| response.payload)
        .ok_or(LifecycleError::NoResponse { stage })
}

async fn run<T>(
    peer_name: &str,
    query: QueryArgs<'_>,
    context: &NetworkContext,
    timeout: Option<Duration>,
    decode: impl FnOnce(&[u8]) -> Result<T, LifecycleError>,
) -> Result<T, LifecycleError> {
    let stage = query.operation();
    let _timer = Timer::new(lifecycle_metrics(), stage.as_str());
    let result = match evaluate(peer_name, query, context, timeout).await {
        Ok(payload) => decode(&payload),
        Err(err) => Err(err),
    };
    observe(stage, result)
}

/// Lists the channel references of one installed package.
pub async fn query_installed_chaincode(
    peer_name: &str,
    package_id: &str,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<Vec<InstalledChannelChaincode>, LifecycleError> {
    run(
        peer_name,
        QueryArgs::InstalledChaincode { package_id },
        context,
        timeout,
        codec::decode_query_installed_result,
    )
    .await
}

/// Lists every package installed on a peer with its channel references.
pub async fn query_all_installed_chaincodes(
    peer_name: &str,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<Vec<InstalledChannelChaincode>, LifecycleError> {
    run(
        peer_name,
        QueryArgs::AllInstalledChaincodes,
        context,
        timeout,
        codec::decode_query_all_installed_result,
    )
    .await
}

/// Fetches the archive of an installed package.
pub async fn query_installed_chaincode_package_file(
    peer_name: &str,
    package_id: &str,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, LifecycleError> {
    run(
        peer_name,
        QueryArgs::InstalledChaincodePackage { package_id },
        context,
        timeout,
        codec::decode_installed_package_result,
    )
    .await
}

/// Reads one committed definition from the context's channel.
pub async fn query_defined_chaincode(
    peer_name: &str,
    chaincode_name: &str,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<DefinedChaincode, LifecycleError> {
    run(
        peer_name,
        QueryArgs::DefinedChaincode {
            name: chaincode_name,
        },
        context,
        timeout,
        |payload| codec::decode_defined_chaincode_result(chaincode_name, payload),
    )
    .await
}

/// Reads every committed definition from the context's channel.
pub async fn query_defined_chaincodes(
    peer_name: &str,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<Vec<DefinedChaincode>, LifecycleError> {
    run(
        peer_name,
        QueryArgs::AllDefinedChaincodes,
        context,
        timeout,
        codec::decode_defined_chaincodes_result,
    )
    .await
}

/// Reports which organizations have approved a prospective definition.
///
/// Unset plugins default to the configured endorsement and validation plugins.
pub async fn query_commit_readiness(
    peer_name: &str,
    definition: &ChaincodeDefinition,
    context: &NetworkContext,
    timeout: Option<Duration>,
) -> Result<CommitReadiness, LifecycleError> {
    let mut prospective = definition.clone();
    prospective
        .endorsement_plugin
        .get_or_insert_with(|| context.config.default_endorsement_plugin.clone());
    prospective
        .validation_plugin
        .get_or_insert_with(|| context.config.default_validation_plugin.clone());
    run(
        peer_name,
        QueryArgs::CommitReadiness(&prospective),
        context,
        timeout,
        codec::decode_commit_readiness_result,
    )
    .await
}
