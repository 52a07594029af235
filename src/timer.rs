//! Execution time probe.

use std::time::{Duration, Instant};

use tracing::debug;

/// Scoped timer that logs how long a storage operation took when dropped.
///
/// ```ignore
/// let _timer = ExecutionTimer::start(format!("[EntryQueryBuilder:GetEntries] userID={user_id}"));
/// ```
#[derive(Debug)]
pub struct ExecutionTimer {
    label: String,
    started_at: Instant,
}

impl ExecutionTimer {
    /// Start timing the given operation.
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started_at: Instant::now(),
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Drop for ExecutionTimer {
    fn drop(&mut self) {
        debug!(target: "feeddeck::timing", "{} took {:?}", self.label, self.elapsed());
    }
}
