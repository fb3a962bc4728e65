//! Record timestamps.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall clock that never goes backwards.
///
/// Readings are truncated to microseconds.
/// If the system clock steps back, readings stay pinned at the last value
/// handed out until real time catches up again.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// Create a new clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, never earlier than any previous reading.
    pub fn now(&self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    /// Fold a raw reading into the clock.
    pub(crate) fn observe(&self, reading: DateTime<Utc>) -> DateTime<Utc> {
        let micros = reading.timestamp_micros();
        let latest = self
            .last_micros
            .fetch_max(micros, Ordering::AcqRel)
            .max(micros);
        Utc.timestamp_micros(latest).single().unwrap_or(reading)
    }
}
