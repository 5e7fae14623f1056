//! # flapwatch
//!
//! A service that detects "flapping" network links - links whose
//! down/error counters keep increasing - from successive telemetry
//! snapshots, accumulates per-link flap state, persists it as a CSV
//! report and pushes flap counters to a remote time-series backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        flapwatch                             │
//! │  ┌─────────┐    ┌───────────────┐    ┌────────────────────┐  │
//! │  │ source  │───▶│ SnapshotStore │───▶│   FlapPipeline     │  │
//! │  │ (file)  │    │  (shared)     │    │ window ▸ detect ▸  │  │
//! │  └─────────┘    └───────────────┘    │ ledger ▸ report ▸  │  │
//! │                                      │ remote write       │  │
//! │                                      └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: settings loading - telemetry source, remote write
//!   endpoint, comparison window and report output directory
//! - **[`source`]**: file-fed snapshot source; the external telemetry
//!   poller drops counter samples into a file and this module publishes
//!   them into the shared store
//! - **[`detect`]**: invocation of the external links-flapping diff
//!   program behind the [`FlapDetector`](flapwatch_pipeline::FlapDetector)
//!   seam
//!
//! The aggregation pipeline itself lives in `flapwatch-pipeline`, the
//! shared schema in `flapwatch-types` and the chunked remote-write client
//! in `flapwatch-remote`.

pub mod config;
pub mod detect;
pub mod source;

pub use config::Settings;
pub use detect::CommandDetector;
pub use source::SnapshotFile;
