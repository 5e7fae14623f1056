//! Durable CSV report of the flap ledger.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use flapwatch_types::FlapRecord;

use crate::FlapLedger;

/// File name of the durable flap report.
pub const REPORT_FILE_NAME: &str = "links_flapping_report.csv";

/// Rewrites the full ledger to a CSV report every cycle.
///
/// The report is rewritten wholesale, not appended: header row, then one
/// row per link in sorted link id order. The write goes to a temp file
/// in the target directory and is renamed into place, so an external
/// reader never observes a truncated report even if the process dies
/// mid-write.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create a writer targeting `<dir>/links_flapping_report.csv`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(REPORT_FILE_NAME),
        }
    }

    /// Path of the report file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the report from the current ledger state.
    ///
    /// An empty ledger still produces a valid report: the header row is
    /// derived from the record schema, not from the first record.
    pub fn persist(&self, ledger: &FlapLedger) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut tmp);
            writer
                .write_record(FlapRecord::CSV_HEADER)
                .context("write report header")?;
            for record in ledger.records() {
                writer
                    .serialize(record)
                    .with_context(|| format!("write report row for {}", record.link_id))?;
            }
            writer.flush().context("flush report")?;
        }

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("rename report into {}", self.path.display()))?;

        debug!(path = %self.path.display(), links = ledger.len(), "flap report rewritten");
        Ok(())
    }
}
