// Path: crates/telemetry/src/time.rs
use crate::sinks::LifecycleMetricsSink;
use std::time::Instant;

/// Reports an operation's duration to a sink when dropped.
pub struct Timer<'a> {
    sink: &'a dyn LifecycleMetricsSink,
    operation: &'static str,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Counts the operation as started and begins timing it.
    pub fn new(sink: &'a dyn LifecycleMetricsSink, operation: &'static str) -> Self {
        sink.inc_operations(operation);
        Self {
            sink,
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_operation_duration(self.operation, self.start.elapsed().as_secs_f64());
    }
}
