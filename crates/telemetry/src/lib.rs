// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # HLF Lifecycle Telemetry
//!
//! Observability for the lifecycle engine: structured logging initialization
//! and abstract sinks that decouple metric instrumentation from any backend.

/// The initialization routine for global structured logging.
pub mod init;
/// Abstract traits (`*MetricsSink`) that define the contract for metrics reporting.
pub mod sinks;
/// A simple RAII timer for measuring the duration of an operation.
pub mod time;

pub use sinks::{lifecycle_metrics, LifecycleMetricsSink};
pub use time::Timer;
