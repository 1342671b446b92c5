use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters for dashboard refreshes, shared across request handlers.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub refreshes: u64,
    pub empty_refreshes: u64,
    pub errors: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    /// Counts one successful reload; `empty` marks a reload that produced no rows.
    pub fn record_refresh(&self, empty: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.refreshes += 1;
            if empty {
                metrics.empty_refreshes += 1;
            }
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
