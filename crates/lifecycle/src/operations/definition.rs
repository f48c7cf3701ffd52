// Path: crates/lifecycle/src/operations/definition.rs

//! Approve and commit: ordered channel transactions handed to the
//! [`ChannelTransactor`](hlf_api::submission::ChannelTransactor).

use super::{lifecycle_function, observe, ApprovalOptions, CommitOptions};
use crate::codec;
use crate::entities::{ApprovedChaincode, ChaincodeStage, InstalledChaincode};
use crate::gateway::resolve_endorsers;
use hlf_api::context::NetworkContext;
use hlf_api::submission::TransactionSubmission;
use hlf_api::transport::{EndorsementRequest, PeerHandle};
use hlf_telemetry::{lifecycle_metrics, Timer};
use hlf_types::error::{LifecycleError, Operation};
use hlf_types::ChaincodeDefinition;
use std::sync::Arc;
use std::time::Duration;

/// Approves a chaincode definition for the signing organization.
///
/// The approval references the installed package when its ID is known, and
/// is made sight-unseen otherwise. The returned chaincode is not committed.
pub async fn approve_chaincode(
    installed: InstalledChaincode,
    options: ApprovalOptions,
    context: &NetworkContext,
) -> Result<ApprovedChaincode, LifecycleError> {
    let stage = Operation::Approve;
    let _timer = Timer::new(lifecycle_metrics(), stage.as_str());
    observe(stage, approve_inner(installed, options, context).await)
}

async fn approve_inner(
    installed: InstalledChaincode,
    options: ApprovalOptions,
    context: &NetworkContext,
) -> Result<ApprovedChaincode, LifecycleError> {
    let stage = Operation::Approve;
    let definition = ChaincodeDefinition {
        name: installed.name().to_string(),
        version: installed.version().to_string(),
        sequence: options.sequence,
        endorsement_policy: options.endorsement_policy,
        collections: options.collections,
        init_required: options.init_required,
        endorsement_plugin: options.endorsement_plugin,
        validation_plugin: options.validation_plugin,
    };
    let arg = codec::encode_approve_args(&definition, installed.package_id())?;

    tracing::info!(
        target: "lifecycle",
        chaincode = %installed.identity(),
        sequence = definition.sequence,
        package_id = installed.package_id().unwrap_or("<unavailable>"),
        channel = %context.channel_name,
        msp_id = context.msp_id(),
        "approving chaincode definition"
    );
    submit(stage, arg, &options.peer_names, options.timeout, context).await?;
    Ok(ApprovedChaincode::from_approval(installed, definition))
}

/// Commits an approved definition to the channel.
///
/// `committed` is set only once the submission has succeeded; a failed commit
/// leaves it untouched.
pub async fn commit_chaincode(
    approved: &mut ApprovedChaincode,
    options: CommitOptions,
    context: &NetworkContext,
) -> Result<(), LifecycleError> {
    let stage = Operation::Commit;
    let _timer = Timer::new(lifecycle_metrics(), stage.as_str());
    observe(stage, commit_inner(approved, options, context).await)
}

async fn commit_inner(
    approved: &mut ApprovedChaincode,
    options: CommitOptions,
    context: &NetworkContext,
) -> Result<(), LifecycleError> {
    let stage = Operation::Commit;
    let arg = codec::encode_commit_args(approved.definition())?;
    tracing::info!(
        target: "lifecycle",
        chaincode = %approved.identity(),
        sequence = approved.sequence(),
        channel = %context.channel_name,
        "committing chaincode definition"
    );
    submit(stage, arg, &options.peer_names, options.timeout, context).await?;
    approved.mark_committed();
    tracing::info!(target: "lifecycle", chaincode = %approved.identity(), "chaincode definition committed");
    Ok(())
}

async fn submit(
    stage: Operation,
    arg: Vec<u8>,
    peer_names: &[String],
    timeout: Option<Duration>,
    context: &NetworkContext,
) -> Result<(), LifecycleError> {
    let endorsers: Vec<Arc<dyn PeerHandle>> = if peer_names.is_empty() {
        tracing::debug!(target: "lifecycle", %stage, "no explicit endorsers; the channel default policy applies");
        Vec::new()
    } else {
        resolve_endorsers(stage, peer_names, context.transport.as_ref()).await?
    };
    let submission = TransactionSubmission {
        request: EndorsementRequest::on_channel(
            &context.channel_name,
            &context.config.namespace,
            lifecycle_function(stage)?,
            arg,
        ),
        endorsers,
        timeout: context.config.effective_timeout(timeout),
    };
    context
        .transactor
        .submit(submission)
        .await
        .map_err(|e| LifecycleError::Submission {
            stage,
            message: e.to_string(),
        })?;
    Ok(())
}
