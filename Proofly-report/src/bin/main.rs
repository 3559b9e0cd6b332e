use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use proofly_data::repository::SnapshotRepository;
use proofly_domain::services::create_default_health_signal_service;
use proofly_report::{build_report, render_report};

/// Print the dashboard report for a snapshot file
///
/// The snapshot path comes from the first argument or `PROOFLY_SNAPSHOT`.
fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Logs go to stderr so stdout stays valid JSON
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("PROOFLY_SNAPSHOT").ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: proofly_report <snapshot.json> (or set PROOFLY_SNAPSHOT)"))?;

    info!("Loading snapshot from {}", path.display());
    let repository = SnapshotRepository::from_path(&path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;

    let service = create_default_health_signal_service();
    let report = build_report(&repository, &service)?;

    println!("{}", render_report(&report)?);
    Ok(())
}
