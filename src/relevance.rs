// src/relevance.rs
//! Marker-based relevance gate: an alert is worth announcing when its
//! title contains one of the configured warning markers.

use serde::Deserialize;

/// Markers matched when no config file provides its own list.
pub const DEFAULT_MARKERS: &[&str] = &["Flood Warning", "Flood Watch"];

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceFilter {
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
}

fn default_markers() -> Vec<String> {
    DEFAULT_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self {
            markers: default_markers(),
        }
    }
}

impl RelevanceFilter {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    /// Case-sensitive substring test against the normalized title.
    pub fn is_relevant(&self, title: &str) -> bool {
        self.markers.iter().any(|m| title.contains(m))
    }
}
