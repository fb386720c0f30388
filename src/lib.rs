// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod engine;
pub mod ingest;
pub mod ledger;
pub mod notify;
pub mod relevance;

// ---- Re-exports for stable public API ----
pub use crate::config::BotConfig;
pub use crate::engine::{Engine, RunMode, RunReport};
pub use crate::ingest::types::{FeedSource, FloodAlert, RawItem};
pub use crate::ledger::{AuditLog, Ledger};
pub use crate::notify::bluesky::BlueskyNotifier;
pub use crate::notify::Announcement;
pub use crate::relevance::RelevanceFilter;
