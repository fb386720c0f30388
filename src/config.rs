// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "FLOODBOT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/floodbot.toml";

/// Every BoM state/territory warnings feed the bot watches by default.
pub const DEFAULT_FEEDS: &[&str] = &[
    "http://www.bom.gov.au/fwo/IDZ00056.warnings_wa.xml",
    "http://www.bom.gov.au/fwo/IDZ00054.warnings_qld.xml",
    "http://www.bom.gov.au/fwo/IDZ00055.warnings_vic.xml",
    "http://www.bom.gov.au/fwo/IDZ00057.warnings_nsw.xml",
    "http://www.bom.gov.au/fwo/IDZ00059.warnings_tas.xml",
    "http://www.bom.gov.au/fwo/IDZ00060.warnings_nt.xml",
    "http://www.bom.gov.au/fwo/IDZ00058.warnings_sa.xml",
];

/// Runtime configuration, loadable from TOML with compiled-in defaults
/// for every field. A missing config file is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub feeds: Vec<String>,
    pub markers: Vec<String>,
    pub ledger_path: PathBuf,
    pub audit_path: PathBuf,
    pub log_path: PathBuf,
    pub service_url: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            markers: crate::relevance::DEFAULT_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ledger_path: PathBuf::from("posted_warnings.txt"),
            audit_path: PathBuf::from("warnings_log.txt"),
            log_path: PathBuf::from("debug.log"),
            service_url: "https://bsky.social".to_string(),
            user_agent: "flood-warning-bot/0.1 (+https://github.com/flood-warning-bot)"
                .to_string(),
            http_timeout_secs: 15,
        }
    }
}

impl BotConfig {
    /// Load using env var + fallback:
    /// 1) $FLOODBOT_CONFIG_PATH (must exist when set)
    /// 2) config/floodbot.toml
    /// 3) compiled-in defaults
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::from_path(&pb);
            }
            return Err(anyhow!("FLOODBOT_CONFIG_PATH points to non-existent path"));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::from_path(&default);
        }
        Ok(Self::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing bot config toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_cover_all_seven_state_feeds() {
        let cfg = BotConfig::default();
        assert_eq!(cfg.feeds.len(), 7);
        assert!(cfg.feeds.iter().any(|f| f.contains("warnings_wa")));
        assert!(cfg.feeds.iter().any(|f| f.contains("warnings_nt")));
        assert_eq!(cfg.ledger_path, PathBuf::from("posted_warnings.txt"));
        assert_eq!(cfg.markers, vec!["Flood Warning", "Flood Watch"]);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg = BotConfig::from_toml_str(
            r#"
            markers = ["Flood Warning", "Flood Watch", "Storm Surge"]
            http_timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(cfg.markers.len(), 3);
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.feeds.len(), 7);
        assert_eq!(cfg.service_url, "https://bsky.social");
    }

    #[test]
    fn feeds_can_be_replaced_wholesale() {
        let cfg = BotConfig::from_toml_str(r#"feeds = ["http://localhost/test.xml"]"#).unwrap();
        assert_eq!(cfg.feeds, vec!["http://localhost/test.xml".to_string()]);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(BotConfig::from_toml_str("feeds = not-a-list").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn load_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_CONFIG_PATH);

        let cfg = BotConfig::load().unwrap();
        assert_eq!(cfg.feeds.len(), 7);

        let p = tmp.path().join("custom.toml");
        fs::write(&p, r#"markers = ["Storm Surge"]"#).unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        let cfg2 = BotConfig::load().unwrap();
        assert_eq!(cfg2.markers, vec!["Storm Surge".to_string()]);
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn env_path_must_exist_when_set() {
        env::set_var(ENV_CONFIG_PATH, "does/not/exist.toml");
        assert!(BotConfig::load().is_err());
        env::remove_var(ENV_CONFIG_PATH);
    }
}
