//! Flap-state aggregation pipeline.
//!
//! One-directional pipeline from telemetry snapshot pairs to persisted
//! per-link flap state and exported counter samples:
//!
//! ```text
//! new snapshot ──▶ SnapshotStore ──▶ ComparisonWindow ──▶ FlapDetector
//!                                                              │
//!                        ReportWriter ◀── FlapLedger ◀── flap events
//!                              │               │
//!                        report CSV      changed records ──▶ SampleSink
//! ```
//!
//! The driver ([`FlapPipeline`]) runs all stages of a cycle sequentially
//! on one task. Only the [`SnapshotStore`] is shared with another thread
//! (the telemetry-polling producer); everything else is owned by the
//! driver, so the ledger needs no locking.

mod detect;
mod export;
mod ledger;
mod pipeline;
mod report;
mod store;
mod window;

pub use detect::FlapDetector;
pub use export::{samples_from_records, SampleSink};
pub use ledger::FlapLedger;
pub use pipeline::FlapPipeline;
pub use report::{ReportWriter, REPORT_FILE_NAME};
pub use store::SnapshotStore;
pub use window::{ComparisonWindow, SnapshotPair};
