use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::types::{FeedSource, RawItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Build the shared HTTP client for feed fetching. The identifying
/// User-Agent is required: BoM answers 403 to default client signatures.
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// One BoM warnings feed, fetched over HTTP or read from a local file
/// (the local mode doubles as the test/override source).
pub struct BomRssSource {
    mode: Mode,
}

enum Mode {
    Http {
        url: String,
        client: reqwest::Client,
    },
    File(PathBuf),
}

impl BomRssSource {
    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::File(path.into()),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<RawItem>> {
        let rss: Rss = from_str(s).context("parsing BoM warnings feed xml")?;

        let out = rss
            .channel
            .item
            .into_iter()
            .map(|it| RawItem {
                title: it.title,
                link: it.link,
                pub_date: it.pub_date,
            })
            .collect();
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for BomRssSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        match &self.mode {
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("fetching feed {url}"))?;
                if !resp.status().is_success() {
                    bail!("feed {url} returned HTTP {}", resp.status());
                }
                let body = resp
                    .text()
                    .await
                    .with_context(|| format!("reading feed body from {url}"))?;
                Self::parse_items_from_str(&body)
            }
            Mode::File(path) => {
                let body = std::fs::read_to_string(path)
                    .with_context(|| format!("reading local feed {}", path.display()))?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> String {
        match &self.mode {
            Mode::Http { url, .. } => url.clone(),
            Mode::File(path) => path.display().to_string(),
        }
    }
}
