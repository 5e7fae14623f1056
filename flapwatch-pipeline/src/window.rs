//! Time-window trigger for comparison cycles.

use std::time::Duration;

use flapwatch_types::TelemetrySnapshot;
use tracing::debug;

/// A (previous, current) snapshot pair due for comparison.
#[derive(Debug, Clone)]
pub struct SnapshotPair {
    pub previous: TelemetrySnapshot,
    pub current: TelemetrySnapshot,
}

impl SnapshotPair {
    /// Seconds between the two capture times.
    pub fn elapsed_secs(&self) -> u64 {
        self.current
            .captured_at
            .saturating_sub(self.previous.captured_at)
    }
}

/// Decides when two snapshots are far enough apart to compare.
///
/// The very first snapshot only establishes the baseline - a single
/// sample cannot be compared against itself. Once a trigger fires the
/// baseline advances to the current snapshot *before* the pair is handed
/// downstream, so a slow or failing comparison never re-runs on the same
/// pair.
#[derive(Debug)]
pub struct ComparisonWindow {
    window: Duration,
    baseline: Option<TelemetrySnapshot>,
}

impl ComparisonWindow {
    /// Create a window trigger with the given minimum elapsed time.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            baseline: None,
        }
    }

    /// Configured minimum elapsed time between compared snapshots.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The snapshot the next comparison will run against, if any.
    pub fn baseline(&self) -> Option<&TelemetrySnapshot> {
        self.baseline.as_ref()
    }

    /// Feed the newest snapshot; returns the pair to compare when due.
    ///
    /// Triggers iff `current.captured_at - baseline.captured_at` is at
    /// least the window duration.
    pub fn observe(&mut self, current: TelemetrySnapshot) -> Option<SnapshotPair> {
        let Some(previous) = self.baseline.clone() else {
            debug!(captured_at = current.captured_at, "recording baseline snapshot");
            self.baseline = Some(current);
            return None;
        };

        let elapsed = current.captured_at.saturating_sub(previous.captured_at);
        if elapsed < self.window.as_secs() {
            debug!(
                elapsed_secs = elapsed,
                window_secs = self.window.as_secs(),
                "window not yet elapsed"
            );
            return None;
        }

        // Advance the baseline before any downstream work runs.
        self.baseline = Some(current.clone());
        Some(SnapshotPair { previous, current })
    }
}
