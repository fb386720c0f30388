//! Flood Warning Bot — Binary Entrypoint
//! One pass per invocation: poll the BoM warnings feeds, announce any
//! new flood warnings on Bluesky, record them, exit.
//!
//! See `README.md` for quickstart and environment flags.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flood_warning_bot::engine::{Engine, RunMode};
use flood_warning_bot::ledger::{AuditLog, Ledger};
use flood_warning_bot::notify::bluesky::BlueskyNotifier;
use flood_warning_bot::relevance::RelevanceFilter;
use flood_warning_bot::BotConfig;

/// Console layer plus a persistent debug-log file layer, so scheduled
/// runs leave a trail even when nobody watched the terminal.
fn init_tracing(log_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flood_warning_bot=info,warn"));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening debug log {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in scheduled environments.
    let _ = dotenvy::dotenv();

    let config = BotConfig::load()?;
    init_tracing(&config.log_path)?;

    let mode = RunMode::from_env();
    if mode.is_dry_run() {
        info!("dry run mode, posts will be printed instead of published");
    }

    let notifier = BlueskyNotifier::from_env(&config.service_url)
        .map(|n| n.with_timeout(config.http_timeout_secs));
    if notifier.is_none() && !mode.is_dry_run() {
        info!("Bluesky credentials not set, new warnings will be recorded but not posted");
    }

    let sources = Engine::build_sources(&config);
    let ledger = Ledger::open(&config.ledger_path)?;
    let audit = AuditLog::open(&config.audit_path);
    let filter = RelevanceFilter::new(config.markers.clone());

    let mut engine = Engine::new(sources, filter, ledger, audit, notifier, mode);
    let report = engine.run().await?;
    info!(
        seen = report.seen,
        relevant = report.relevant,
        announced = report.announced,
        "run finished"
    );
    Ok(())
}
