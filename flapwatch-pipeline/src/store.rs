//! Shared store for the most recent telemetry snapshot.

use flapwatch_types::TelemetrySnapshot;
use parking_lot::Mutex;

/// Holds the latest telemetry snapshot published by the polling side.
///
/// The producer thread replaces the snapshot atomically; the pipeline
/// clones it out under a short lock. The lock is never held across
/// comparison or export work, so the producer is never blocked by a slow
/// cycle.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Mutex<Option<TelemetrySnapshot>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot with a newer one.
    pub fn publish(&self, snapshot: TelemetrySnapshot) {
        *self.latest.lock() = Some(snapshot);
    }

    /// Copy out the latest snapshot, if any has been published yet.
    pub fn latest(&self) -> Option<TelemetrySnapshot> {
        self.latest.lock().clone()
    }
}
