//! Headless print runner.
//!
//! Loads a project file, refreshes barcode rasters, and ships the label to
//! the configured printer:
//!
//! ```text
//! labelpress <project.json> [--probe-only]
//! ```

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use labelpress::{AppConfig, EditorSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path: PathBuf = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: labelpress <project.json> [--probe-only]"))?
        .into();
    let probe_only = args.next().as_deref() == Some("--probe-only");

    let config = AppConfig::load();
    tracing::info!(
        host = %config.printer_host,
        port = config.printer_port,
        printer_dpi = config.printer_dpi,
        design_dpi = config.design_dpi,
        "Starting labelpress"
    );

    let session = EditorSession::new(config);
    session.load_project(&path).await?;

    if !session.probe_printer().await {
        anyhow::bail!("printer is unreachable");
    }
    tracing::info!("Printer reachable");
    if probe_only {
        return Ok(());
    }

    let refreshed = session.encode_all().await;
    tracing::info!(refreshed, "Barcode rasters refreshed");

    session.print().await?;
    tracing::info!("Done");
    Ok(())
}
