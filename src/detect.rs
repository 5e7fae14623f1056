//! External diff program invocation.
//!
//! The links-flapping diff algorithm is an external collaborator: given
//! two counter snapshots, it reports the links whose counters increased.
//! This module only hands the snapshots over and parses the result.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use flapwatch_pipeline::FlapDetector;
use flapwatch_types::{FlapEvent, TelemetrySnapshot};

/// Runs the external links-flapping diff program.
///
/// The two snapshots are written to temp files and passed as the
/// program's two arguments (previous first). The program prints the flap
/// events as CSV on stdout with a header row of
/// `link_id,node_description,partner_node_description,estimated_time`.
#[derive(Debug)]
pub struct CommandDetector {
    program: PathBuf,
}

impl CommandDetector {
    /// Create a detector invoking the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program being invoked.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn snapshot_file(snapshot: &TelemetrySnapshot) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new().context("create snapshot temp file")?;
        file.write_all(snapshot.raw.as_bytes())
            .context("write snapshot temp file")?;
        file.flush().context("flush snapshot temp file")?;
        Ok(file)
    }
}

impl FlapDetector for CommandDetector {
    fn detect(
        &self,
        previous: &TelemetrySnapshot,
        current: &TelemetrySnapshot,
    ) -> Result<Vec<FlapEvent>> {
        let prev_file = Self::snapshot_file(previous)?;
        let cur_file = Self::snapshot_file(current)?;

        debug!(program = %self.program.display(), "invoking diff program");
        let output = Command::new(&self.program)
            .arg(prev_file.path())
            .arg(cur_file.path())
            .output()
            .with_context(|| format!("run diff program {}", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "diff program exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let mut events = Vec::new();
        let mut reader = csv::Reader::from_reader(output.stdout.as_slice());
        for row in reader.deserialize() {
            let event: FlapEvent = row.context("parse diff program output")?;
            events.push(event);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write an executable shell script; the file must be closed before
    /// exec, or the kernel refuses with ETXTBSY.
    #[cfg(unix)]
    fn script(body: &str) -> (tempfile::TempDir, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    }

    fn snapshots() -> (TelemetrySnapshot, TelemetrySnapshot) {
        (
            TelemetrySnapshot::new("port,link_down\np1,3\n", 0),
            TelemetrySnapshot::new("port,link_down\np1,5\n", 7200),
        )
    }

    #[cfg(unix)]
    #[test]
    fn parses_events_from_program_output() {
        let (_dir, script) = script(
            "echo 'link_id,node_description,partner_node_description,estimated_time'\n\
             echo 'L1,switch-a:1,switch-b:7,1970-01-01 01:58:20'",
        );
        let detector = CommandDetector::new(&script);

        let (prev, cur) = snapshots();
        let events = detector.detect(&prev, &cur).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].link_id, "L1");
        assert_eq!(events[0].estimated_time, "1970-01-01 01:58:20");
    }

    #[cfg(unix)]
    #[test]
    fn program_receives_both_snapshot_files() {
        // The script echoes a counter out of each argument back as an
        // event field, proving argument order (previous, current).
        let (_dir, script) = script(
            "echo 'link_id,node_description,partner_node_description,estimated_time'\n\
             echo \"L1,prev-$(tail -1 \"$1\" | cut -d, -f2),cur-$(tail -1 \"$2\" | cut -d, -f2),1970-01-01 01:58:20\"",
        );
        let detector = CommandDetector::new(&script);

        let (prev, cur) = snapshots();
        let events = detector.detect(&prev, &cur).unwrap();

        assert_eq!(events[0].node_description, "prev-3");
        assert_eq!(events[0].partner_node_description, "cur-5");
    }

    #[cfg(unix)]
    #[test]
    fn header_only_output_means_no_flaps() {
        let (_dir, script) =
            script("echo 'link_id,node_description,partner_node_description,estimated_time'");
        let detector = CommandDetector::new(&script);

        let (prev, cur) = snapshots();
        assert!(detector.detect(&prev, &cur).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_error() {
        let (_dir, script) = script("echo 'bad counter table' >&2\nexit 3");
        let detector = CommandDetector::new(&script);

        let (prev, cur) = snapshots();
        let err = detector.detect(&prev, &cur).unwrap_err();
        assert!(err.to_string().contains("bad counter table"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let detector = CommandDetector::new("/nonexistent/links-flapping-diff");
        let (prev, cur) = snapshots();
        assert!(detector.detect(&prev, &cur).is_err());
    }
}
