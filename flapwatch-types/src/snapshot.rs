//! Telemetry snapshot - a raw counter table captured at one point in time.

use std::sync::Arc;

/// A full textual counter dump plus its capture time.
///
/// The table text is opaque to flapwatch: only the flap detector looks
/// inside it. A snapshot is never mutated after capture; the shared `Arc`
/// makes copying one out of the store cheap, so the lock guarding the
/// store is held only for the length of a pointer clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Raw counter table, exactly as captured.
    pub raw: Arc<str>,
    /// Unix timestamp in seconds when the sample was captured.
    pub captured_at: u64,
}

impl TelemetrySnapshot {
    /// Create a snapshot from raw table text and its capture time.
    pub fn new(raw: impl Into<Arc<str>>, captured_at: u64) -> Self {
        Self {
            raw: raw.into(),
            captured_at,
        }
    }

    /// Whether the captured table is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
