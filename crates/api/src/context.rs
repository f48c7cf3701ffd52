// Path: crates/api/src/context.rs

use crate::signing::SigningContext;
use crate::submission::ChannelTransactor;
use crate::transport::PeerTransport;
use hlf_types::config::LifecycleConfig;
use std::fmt;
use std::sync::Arc;

/// Channel, identity and transport handles for one lifecycle call.
///
/// The engine only reads from the context; it is cheap to clone and safe to
/// share between concurrent calls.
#[derive(Clone)]
pub struct NetworkContext {
    /// The channel approvals, commits and definition queries target.
    pub channel_name: String,
    /// Resolves peer names to connected handles.
    pub transport: Arc<dyn PeerTransport>,
    /// Signs proposals with the caller's identity.
    pub signer: Arc<dyn SigningContext>,
    /// Submits ordered channel transactions.
    pub transactor: Arc<dyn ChannelTransactor>,
    /// Lifecycle tunables.
    pub config: LifecycleConfig,
}

impl NetworkContext {
    /// Creates a context with the default configuration.
    pub fn new(
        channel_name: impl Into<String>,
        transport: Arc<dyn PeerTransport>,
        signer: Arc<dyn SigningContext>,
        transactor: Arc<dyn ChannelTransactor>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            transport,
            signer,
            transactor,
            config: LifecycleConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// The MSP ID of the signing organization.
    pub fn msp_id(&self) -> &str {
        self.signer.msp_id()
    }
}

impl fmt::Debug for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkContext")
            .field("channel_name", &self.channel_name)
            .field("msp_id", &self.signer.msp_id())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
