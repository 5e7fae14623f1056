//! Settings loading for the flapwatch service.
//!
//! Configuration is read once at startup; malformed required values are
//! fatal before any pipeline cycle runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use flapwatch_types::parse_window;

/// Default endpoint of the low-frequency telemetry counter set.
const DEFAULT_TELEMETRY_URL: &str = "http://127.0.0.1:9002/csv/xcset/low_freq_debug";

/// Telemetry source settings, consumed by the polling side.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// URL the telemetry poller fetches counter snapshots from.
    pub url: String,
    /// Poll interval in seconds.
    pub interval: u64,
    /// Whether telemetry consumption is enabled at all.
    pub enabled: bool,
    /// Counter-table columns exported as labels by the telemetry exporter.
    pub labels_to_export: Vec<String>,
    /// Counter-table columns exported as metrics by the telemetry exporter.
    pub metrics_to_export: Vec<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TELEMETRY_URL.to_string(),
            interval: 300,
            enabled: true,
            labels_to_export: [
                "Node_GUID",
                "port_guid",
                "Port_Number",
                "Device_ID",
                "node_description",
            ]
            .map(String::from)
            .to_vec(),
            metrics_to_export: vec!["Link_Down".to_string()],
        }
    }
}

/// Remote time-series write endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub host: String,
    pub port: u16,
    /// Largest number of samples per remote-write request.
    pub max_chunk_size: usize,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9292,
            max_chunk_size: 10_000,
        }
    }
}

/// Flapping-analysis settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlappingSettings {
    /// Comparison window as `<number><d|h|m>`, e.g. `2h`.
    pub window: String,
    /// Directory the CSV report is written into; created if absent.
    pub output_dir: PathBuf,
}

impl Default for FlappingSettings {
    fn default() -> Self {
        Self {
            window: "2h".to_string(),
            output_dir: PathBuf::from("link_flapping"),
        }
    }
}

/// Process-wide settings, constructed once at startup and passed
/// explicitly to each component.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub telemetry: TelemetrySettings,
    pub remote: RemoteSettings,
    pub flapping: FlappingSettings,
}

impl Settings {
    /// Load settings from an optional file plus `FLAPWATCH_*` environment
    /// overrides (e.g. `FLAPWATCH_REMOTE__PORT=9201`).
    ///
    /// Fails, rather than starting the pipeline, when the file is
    /// unreadable or a value such as the window duration is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder = builder.add_source(Environment::with_prefix("FLAPWATCH").separator("__"));

        let settings: Settings = builder
            .build()
            .context("read configuration")?
            .try_deserialize()
            .context("parse configuration")?;

        // Surface malformed durations now, not on the first cycle.
        settings.window()?;
        Ok(settings)
    }

    /// Parsed comparison window.
    pub fn window(&self) -> Result<Duration> {
        parse_window(&self.flapping.window)
            .with_context(|| format!("[flapping] window = {:?}", self.flapping.window))
    }

    /// Ensure the report output directory exists and return it.
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.flapping.output_dir).with_context(|| {
            format!(
                "create output directory {}",
                self.flapping.output_dir.display()
            )
        })?;
        Ok(&self.flapping.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_shipped_configuration() {
        let settings = Settings::default();

        assert_eq!(settings.telemetry.url, DEFAULT_TELEMETRY_URL);
        assert_eq!(settings.telemetry.interval, 300);
        assert!(settings.telemetry.enabled);
        assert_eq!(settings.telemetry.metrics_to_export, ["Link_Down"]);
        assert_eq!(settings.remote.port, 9292);
        assert_eq!(settings.remote.max_chunk_size, 10_000);
        assert_eq!(settings.flapping.window, "2h");
        assert_eq!(settings.window().unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn loads_overrides_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[remote]
host = "10.1.2.3"
max_chunk_size = 500

[flapping]
window = "30m"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.remote.host, "10.1.2.3");
        assert_eq!(settings.remote.max_chunk_size, 500);
        // Untouched sections keep their defaults.
        assert_eq!(settings.remote.port, 9292);
        assert_eq!(settings.window().unwrap(), Duration::from_secs(1800));
    }

    #[test]
    fn malformed_window_fails_at_load() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[flapping]\nwindow = \"abc\"").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("window"));
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(Settings::load(Some(Path::new("/nonexistent/flapwatch.toml"))).is_err());
    }

    #[test]
    fn ensure_output_dir_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.flapping.output_dir = dir.path().join("nested/reports");

        let path = settings.ensure_output_dir().unwrap();
        assert!(path.is_dir());
    }
}
