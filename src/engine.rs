// src/engine.rs
//! One full check-and-announce pass: fetch all feeds, normalize, audit,
//! filter, deduplicate against the ledger, publish what is new.

use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::ingest::providers::bom_rss::{build_http_client, BomRssSource};
use crate::ingest::types::{FeedSource, FloodAlert};
use crate::ledger::{AuditLog, Ledger};
use crate::notify::bluesky::BlueskyNotifier;
use crate::notify::Announcement;
use crate::relevance::RelevanceFilter;

pub const ENV_DRY_RUN: &str = "FLOODBOT_DRY_RUN";
pub const ENV_FEED_FILE: &str = "FLOODBOT_FEED_FILE";
const ENV_CI: &str = "CI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Live,
    DryRun,
}

impl RunMode {
    /// Resolve the mode from the environment. `CI=true` always means a
    /// scheduled run and forces live posting; otherwise
    /// `FLOODBOT_DRY_RUN=1` switches posting off for local testing.
    pub fn from_env() -> Self {
        if std::env::var(ENV_CI).ok().as_deref() == Some("true") {
            return RunMode::Live;
        }
        if std::env::var(ENV_DRY_RUN).ok().as_deref() == Some("1") {
            return RunMode::DryRun;
        }
        RunMode::Live
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Counters for one pass, reported at the end of the run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub seen: usize,
    pub relevant: usize,
    pub announced: usize,
}

pub struct Engine {
    sources: Vec<Box<dyn FeedSource>>,
    filter: RelevanceFilter,
    ledger: Ledger,
    audit: AuditLog,
    notifier: Option<BlueskyNotifier>,
    mode: RunMode,
}

impl Engine {
    pub fn new(
        sources: Vec<Box<dyn FeedSource>>,
        filter: RelevanceFilter,
        ledger: Ledger,
        audit: AuditLog,
        notifier: Option<BlueskyNotifier>,
        mode: RunMode,
    ) -> Self {
        Self {
            sources,
            filter,
            ledger,
            audit,
            notifier,
            mode,
        }
    }

    /// Assemble sources from config, honoring the local-file override
    /// (`FLOODBOT_FEED_FILE`) used for testing against a saved feed.
    pub fn build_sources(config: &BotConfig) -> Vec<Box<dyn FeedSource>> {
        if let Ok(path) = std::env::var(ENV_FEED_FILE) {
            info!(path = %path, "using local feed file instead of live feeds");
            return vec![Box::new(BomRssSource::from_file(path))];
        }
        let client = build_http_client(&config.user_agent, config.http_timeout_secs);
        config
            .feeds
            .iter()
            .map(|url| {
                Box::new(BomRssSource::from_url(url.clone(), client.clone()))
                    as Box<dyn FeedSource>
            })
            .collect()
    }

    pub async fn run(&mut self) -> Result<RunReport> {
        info!("checking feeds for new flood warnings");
        let mut report = RunReport::default();
        let alerts = crate::ingest::run_once(&self.sources).await;
        report.seen = alerts.len();
        if alerts.is_empty() {
            info!("no warnings found");
            return Ok(report);
        }

        let mut queued: HashSet<String> = HashSet::new();
        let mut candidates: Vec<FloodAlert> = Vec::new();
        for alert in alerts {
            self.audit.append(&alert.published_at, &alert.title)?;
            if !self.filter.is_relevant(&alert.title) {
                debug!(title = %alert.title, "not a flood warning, skipping");
                continue;
            }
            report.relevant += 1;
            let id = alert.id();
            if self.ledger.contains(&id) || !queued.insert(id) {
                debug!(title = %alert.title, "already announced, skipping");
                continue;
            }
            info!(title = %alert.clean_title, "new flood warning detected");
            candidates.push(alert);
        }

        for alert in candidates {
            self.announce(&alert).await;
            self.ledger.record(&alert.id())?;
            report.announced += 1;
        }
        Ok(report)
    }

    /// Publish one alert, or print it in dry-run mode. Publish failures
    /// are logged and swallowed so the alert is still recorded and the
    /// rest of the batch still goes out.
    async fn announce(&self, alert: &FloodAlert) {
        let announcement = Announcement::for_alert(&alert.clean_title, &alert.link);
        if self.mode.is_dry_run() {
            info!(post = %announcement.text(), "dry run, not posting");
            return;
        }
        match &self.notifier {
            Some(notifier) => {
                if let Err(e) = notifier.post(&announcement).await {
                    warn!(error = %e, post = %announcement.text(), "posting to Bluesky failed");
                } else {
                    info!(title = %alert.clean_title, "posted warning to Bluesky");
                }
            }
            None => {
                error!(
                    title = %alert.clean_title,
                    "Bluesky credentials not set, skipping post"
                );
            }
        }
    }
}
