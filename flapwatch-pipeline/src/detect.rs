//! Detector seam for the external snapshot-diff strategy.

use anyhow::Result;
use flapwatch_types::{FlapEvent, TelemetrySnapshot};

/// Strategy that compares two counter snapshots and reports the links
/// whose down/error counters increased, each with an estimated event
/// time.
///
/// The diff algorithm itself is an external collaborator; the pipeline
/// only invokes it, times it and isolates its failures. Any `Fn` with
/// the matching signature is a detector, which keeps tests free of
/// boilerplate.
pub trait FlapDetector: Send {
    fn detect(
        &self,
        previous: &TelemetrySnapshot,
        current: &TelemetrySnapshot,
    ) -> Result<Vec<FlapEvent>>;
}

impl<F> FlapDetector for F
where
    F: Fn(&TelemetrySnapshot, &TelemetrySnapshot) -> Result<Vec<FlapEvent>> + Send,
{
    fn detect(
        &self,
        previous: &TelemetrySnapshot,
        current: &TelemetrySnapshot,
    ) -> Result<Vec<FlapEvent>> {
        self(previous, current)
    }
}
