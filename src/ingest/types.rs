// src/ingest/types.rs
use anyhow::Result;

/// One entry as it came out of a feed document, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
}

/// A normalized warning entry. `published_at` is an RFC 3339 UTC string,
/// or the `UNKNOWN_DATE` sentinel when the feed gave no usable date.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FloodAlert {
    pub title: String,
    pub clean_title: String,
    pub link: String,
    pub published_at: String,
}

impl FloodAlert {
    /// Deduplication key. Identical title + identical timestamp means the
    /// same warning, no matter which feed carried it or when it was fetched.
    pub fn id(&self) -> String {
        format!("{}|{}", self.title, self.published_at)
    }
}

#[async_trait::async_trait]
pub trait FeedSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> String;
}
