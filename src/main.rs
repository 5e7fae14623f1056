use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flapwatch::{CommandDetector, Settings, SnapshotFile};
use flapwatch_pipeline::{FlapPipeline, ReportWriter, SnapshotStore};
use flapwatch_remote::RemoteWriter;

#[derive(Parser, Debug)]
#[command(name = "flapwatch")]
#[command(about = "Detects flapping links from telemetry snapshots and exports flap counters")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File the telemetry poller writes counter snapshots to
    #[arg(short, long, default_value = "telemetry_sample.csv")]
    snapshot_file: PathBuf,

    /// External diff program producing flap events from two snapshots
    #[arg(short, long, default_value = "links-flapping-diff")]
    diff_program: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Configuration errors are fatal here, before any cycle runs.
    let settings = Settings::load(args.config.as_deref())?;
    let window = settings.window()?;
    let output_dir = settings.ensure_output_dir()?.to_path_buf();

    let store = Arc::new(SnapshotStore::new());
    let (notify_tx, notify_rx) = mpsc::channel(16);

    let writer = RemoteWriter::new(
        &settings.remote.host,
        settings.remote.port,
        settings.remote.max_chunk_size,
    );
    let pipeline = FlapPipeline::new(
        store.clone(),
        window,
        Box::new(CommandDetector::new(&args.diff_program)),
        ReportWriter::new(&output_dir),
        Box::new(writer),
    );

    info!(
        window_secs = window.as_secs(),
        report_dir = %output_dir.display(),
        snapshot_file = %args.snapshot_file.display(),
        "starting flapwatch"
    );

    let driver = tokio::spawn(pipeline.run(notify_rx));

    if settings.telemetry.enabled {
        let source = SnapshotFile::new(&args.snapshot_file);
        source
            .run(
                Duration::from_secs(settings.telemetry.interval),
                store,
                notify_tx,
            )
            .await;
    } else {
        info!("telemetry consumption disabled, pipeline idle");
        drop(notify_tx);
    }

    driver.await?;
    Ok(())
}
