//! File-fed snapshot source.
//!
//! The external telemetry poller drops each counter sample into a file;
//! this source watches the file's modification time, publishes new
//! samples into the shared [`SnapshotStore`] and notifies the pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use flapwatch_pipeline::SnapshotStore;
use flapwatch_types::TelemetrySnapshot;

/// Watches a snapshot file and turns each new version into a
/// [`TelemetrySnapshot`].
///
/// The file's modification time doubles as the snapshot capture time, so
/// only the writer of the file controls the comparison timeline.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    last_error: Option<String>,
}

impl SnapshotFile {
    /// Create a source watching the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
            last_error: None,
        }
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Error from the most recent poll, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Poll once; returns a snapshot when the file changed since the
    /// last successful read.
    pub fn poll(&mut self) -> Option<TelemetrySnapshot> {
        let current = self.modified_time();

        let changed = match (&self.last_modified, &current) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep last state
            (Some(last), Some(now)) => now > last,
        };
        if !changed {
            return None;
        }

        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                self.last_error = None;
                self.last_modified = current;
                let captured_at = current
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                debug!(path = %self.path.display(), captured_at, "read new telemetry snapshot");
                Some(TelemetrySnapshot::new(raw, captured_at))
            }
            Err(e) => {
                self.last_error = Some(format!("read error: {}", e));
                None
            }
        }
    }

    /// Poll on `interval` forever, publishing into `store` and waking
    /// the pipeline through `notify`.
    ///
    /// Stops when the pipeline side of the notification channel closes.
    pub async fn run(
        mut self,
        interval: Duration,
        store: Arc<SnapshotStore>,
        notify: mpsc::Sender<()>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Some(snapshot) = self.poll() {
                store.publish(snapshot);
                if notify.send(()).await.is_err() {
                    break;
                }
            } else if let Some(err) = self.error() {
                warn!(path = %self.path.display(), error = err, "snapshot file poll failed");
            }
        }
    }
}
