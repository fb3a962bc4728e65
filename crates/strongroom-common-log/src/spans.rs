//! Span helpers for the audit pipeline.

use std::future::Future;
use tracing::{field, info_span, Instrument, Span};

/// Create a span for one intercepted invocation.
///
/// The `outcome` and `error` fields start empty and are filled in as the
/// pipeline progresses.
pub fn audit_span(operation: &str) -> Span {
    info_span!(
        "audit",
        op = %operation,
        outcome = field::Empty,
        error = field::Empty,
    )
}

/// Create a span for a store write.
pub fn store_span(backend: &str, entity_type: &str) -> Span {
    info_span!("audit_store", backend = %backend, entity = %entity_type)
}

/// Create a span for a schema migration.
pub fn migration_span(version: i64, name: &str) -> Span {
    info_span!("migration", version, name = %name)
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %self.start.elapsed().as_millis(),
            "operation completed"
        );
    }
}
