//! Core types for link-flap monitoring - the shared schema for flapwatch.
//!
//! A *flap* is a link whose down/error counters increased between two
//! successive telemetry snapshots. This crate defines the types that flow
//! through the flapwatch pipeline:
//!
//! - [`TelemetrySnapshot`]: an opaque counter table tagged with its capture
//!   time. Snapshots are only ever compared as a (previous, current) pair.
//! - [`FlapEvent`]: one link reported as flapping by the snapshot diff.
//! - [`FlapRecord`]: the cumulative per-link state that survives across
//!   comparison cycles and lands in the durable CSV report.
//! - [`RemoteSample`]: the normalized metric shape pushed to the
//!   time-series backend.
//! - [`parse_window`]: parsing for the `<number><d|h|m>` comparison-window
//!   duration used in configuration.
//!
//! Serde derives are available behind the `serde` feature.

mod flap;
mod sample;
mod snapshot;
mod window;

pub use flap::{FlapEvent, FlapRecord};
pub use sample::{RemoteSample, TimestampError, FLAP_COUNTER_METRIC, TIME_FORMAT};
pub use snapshot::TelemetrySnapshot;
pub use window::{parse_window, WindowParseError};
