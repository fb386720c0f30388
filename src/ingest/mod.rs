// src/ingest/mod.rs
pub mod providers;
pub mod types;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::{debug, warn};

use crate::ingest::types::{FeedSource, FloodAlert, RawItem};

/// Sentinel stored when a feed item carries no parseable publication date.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Decode HTML entities and trim surrounding whitespace.
pub fn normalize_title(raw: &str) -> String {
    html_escape::decode_html_entities(raw).trim().to_string()
}

/// Strip the leading BoM issue-time prefix ("dd/hh:mm:ss TZN ") when
/// present. Titles without the prefix pass through unchanged.
pub fn clean_title(title: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\d{2}/\d{2}:\d{2}:\d{2} [A-Z]{3} ").expect("valid clean-title regex")
    });
    re.replace(title, "").into_owned()
}

/// Convert an RSS pubDate (RFC 2822) into an RFC 3339 UTC string.
/// Anything unparseable maps to the `UNKNOWN_DATE` sentinel.
pub fn normalize_pub_date(pub_date: Option<&str>) -> String {
    match pub_date {
        Some(s) => match DateTime::parse_from_rfc2822(s.trim()) {
            Ok(dt) => dt.with_timezone(&Utc).to_rfc3339(),
            Err(e) => {
                debug!(pub_date = %s, error = %e, "unparseable pubDate, using sentinel");
                UNKNOWN_DATE.to_string()
            }
        },
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Turn a raw feed item into a normalized alert. Items missing a title
/// or link are dropped: there is nothing to announce without both.
pub fn normalize_item(item: &RawItem) -> Option<FloodAlert> {
    let title = normalize_title(item.title.as_deref()?);
    if title.is_empty() {
        return None;
    }
    let link = item.link.as_deref()?.trim().to_string();
    if link.is_empty() {
        return None;
    }
    let published_at = normalize_pub_date(item.pub_date.as_deref());
    let clean = clean_title(&title);
    Some(FloodAlert {
        clean_title: clean,
        title,
        link,
        published_at,
    })
}

/// Fetch and normalize every source in order. A failing source is
/// logged and skipped so one broken feed cannot sink the whole run.
pub async fn run_once(sources: &[Box<dyn FeedSource>]) -> Vec<FloodAlert> {
    let mut alerts = Vec::new();
    for source in sources {
        tracing::info!(source = %source.name(), "checking feed");
        match source.fetch_latest().await {
            Ok(items) => {
                alerts.extend(items.iter().filter_map(normalize_item));
            }
            Err(e) => {
                warn!(source = %source.name(), error = %e, "feed fetch failed, skipping");
            }
        }
    }
    alerts
}
