//! The comparison-cycle driver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::{
    samples_from_records, ComparisonWindow, FlapDetector, FlapLedger, ReportWriter, SampleSink,
    SnapshotPair, SnapshotStore,
};

/// One-directional pipeline from snapshot pairs to persisted flap state
/// and exported counter samples.
///
/// Invoked on every "new data" notification; all stages of a cycle run
/// sequentially on the driver task. Once a cycle starts it runs to
/// completion or fails - there is no cancellation and no timeout on the
/// diff itself; a slow diff simply delays the next trigger evaluation.
pub struct FlapPipeline {
    store: Arc<SnapshotStore>,
    window: ComparisonWindow,
    detector: Box<dyn FlapDetector>,
    ledger: FlapLedger,
    report: ReportWriter,
    sink: Box<dyn SampleSink>,
}

impl FlapPipeline {
    /// Wire a pipeline together.
    pub fn new(
        store: Arc<SnapshotStore>,
        window: Duration,
        detector: Box<dyn FlapDetector>,
        report: ReportWriter,
        sink: Box<dyn SampleSink>,
    ) -> Self {
        Self {
            store,
            window: ComparisonWindow::new(window),
            detector,
            ledger: FlapLedger::new(),
            report,
            sink,
        }
    }

    /// Current per-link state.
    pub fn ledger(&self) -> &FlapLedger {
        &self.ledger
    }

    /// Handle one "new data arrived" notification.
    ///
    /// Copies the latest snapshot out of the store under a short lock,
    /// evaluates the comparison window, and runs a full cycle when due.
    pub async fn on_new_data(&mut self) {
        let Some(current) = self.store.latest() else {
            return;
        };
        let Some(pair) = self.window.observe(current) else {
            return;
        };
        self.run_cycle(pair).await;
    }

    /// Drive the pipeline until the notification channel closes.
    pub async fn run(mut self, mut notifications: mpsc::Receiver<()>) {
        while notifications.recv().await.is_some() {
            self.on_new_data().await;
        }
        info!("notification channel closed, pipeline stopping");
    }

    async fn run_cycle(&mut self, pair: SnapshotPair) {
        info!(
            elapsed_secs = pair.elapsed_secs(),
            "starting links flapping analysis"
        );
        let started = Instant::now();

        let events = match self.detector.detect(&pair.previous, &pair.current) {
            Ok(events) => events,
            Err(err) => {
                // The baseline already advanced, so this pair is never
                // retried; the cycle is a no-op.
                error!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "links flapping analysis failed, skipping cycle"
                );
                return;
            }
        };
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            flapped = events.len(),
            "links flapping analysis completed"
        );

        let changed = self.ledger.apply(&events);

        // Persistence failure keeps the in-memory state for the next
        // cycle's attempt and does not block the export below.
        if let Err(err) = self.report.persist(&self.ledger) {
            error!(
                path = %self.report.path().display(),
                error = %err,
                "failed to rewrite flap report, state kept in memory"
            );
        }

        if changed.is_empty() {
            return;
        }
        let samples = samples_from_records(&changed);
        if samples.is_empty() {
            return;
        }

        let outcome = self.sink.push(samples).await;
        if outcome.is_complete() {
            info!(delivered = outcome.delivered, "flap samples pushed");
        } else {
            for failure in &outcome.failures {
                warn!(
                    chunk = failure.index,
                    samples = failure.samples,
                    error = %failure.error,
                    "sample chunk push failed"
                );
            }
        }
    }
}
