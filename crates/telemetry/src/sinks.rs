// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `LifecycleMetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn LifecycleMetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured lifecycle metrics sink.
/// If no sink has been installed, it returns a no-op sink.
pub fn lifecycle_metrics() -> &'static dyn LifecycleMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Installs the global sink. Returns `false` if one was already installed.
pub fn install_sink(sink: &'static dyn LifecycleMetricsSink) -> bool {
    SINK.set(sink).is_ok()
}

/// A sink for metrics related to chaincode lifecycle operations.
///
/// `operation` is the stable stage label (`install`, `approve`, ...).
pub trait LifecycleMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of operations started.
    fn inc_operations(&self, operation: &str);
    /// Increments the counter of failed operations, labeled by error code.
    fn inc_operation_failures(&self, operation: &str, error_code: &str);
    /// Increments the counter of proposal responses received from peers.
    fn inc_peer_responses(&self, operation: &str, count: u64);
    /// Observes the wall-clock duration of an operation.
    fn observe_operation_duration(&self, operation: &str, duration_secs: f64);
}

impl LifecycleMetricsSink for NopSink {
    fn inc_operations(&self, _operation: &str) {}
    fn inc_operation_failures(&self, _operation: &str, _error_code: &str) {}
    fn inc_peer_responses(&self, _operation: &str, _count: u64) {}
    fn observe_operation_duration(&self, _operation: &str, _duration_secs: f64) {}
}
