//! Runtime configuration.
//!
//! Settings come from an optional YAML file, then command-line flags and
//! environment variables override individual values (see [`AppConfig::apply_cli`]).
//! Every field has a default, so an empty file or no file at all is valid.
//!
//! ```yaml
//! count: 10
//! output_dir: ./output
//! cache:
//!   path: /tmp/tech_news_cache.json
//!   duration_secs: 3600
//! sources:
//!   newsapi:
//!     api_key: "..."
//!     query: technology AI
//!   gnews:
//!     api_key: "..."
//! delivery:
//!   webhook_url: https://example.com/hook
//! score_seed: 42
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::fallback;
use crate::models::{NewsItem, clamp_hot_score};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
pub const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";
pub const TIANXING_URL: &str = "http://api.tianapi.com/keji/index";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of headlines to fetch and publish.
    pub count: usize,
    /// Directory for cards, run reports and locally saved notes.
    pub output_dir: PathBuf,
    pub cache: CacheConfig,
    /// Per-request deadline for news sources.
    pub request_timeout_secs: u64,
    /// Per-request deadline for the delivery webhook.
    pub delivery_timeout_secs: u64,
    pub sources: SourcesConfig,
    pub delivery: DeliveryConfig,
    /// Seed for hot-score randomness; unseeded runs use OS entropy.
    pub score_seed: Option<u64>,
    /// Replacement for the built-in fallback headlines.
    pub fallback: Option<Vec<NewsItem>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            count: 10,
            output_dir: PathBuf::from("./output"),
            cache: CacheConfig::default(),
            request_timeout_secs: 10,
            delivery_timeout_secs: 30,
            sources: SourcesConfig::default(),
            delivery: DeliveryConfig::default(),
            score_seed: None,
            fallback: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
    pub duration_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("tech_news_cache.json"),
            duration_secs: 3600,
        }
    }
}

/// Credentials and endpoints, one section per provider, in priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub newsapi: SourceConfig,
    pub gnews: SourceConfig,
    pub tianxing: SourceConfig,
}

/// One provider. A missing or blank `api_key` disables the provider;
/// `base_url` and `query` fall back to the provider's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub query: Option<String>,
}

impl SourceConfig {
    /// The API key, if one is set and non-blank.
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url.as_deref().unwrap_or(default)
    }

    pub fn query_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.query.as_deref().unwrap_or(default)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load from `path`, or defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml rejects an empty document for a struct
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay values given on the command line or through the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(count) = cli.count {
            self.count = count;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(path) = &cli.cache_path {
            self.cache.path = path.clone();
        }
        overlay(&mut self.sources.newsapi.api_key, &cli.newsapi_key);
        overlay(&mut self.sources.gnews.api_key, &cli.gnews_key);
        overlay(&mut self.sources.tianxing.api_key, &cli.tianxing_key);
        overlay(&mut self.delivery.webhook_url, &cli.getnote_webhook_url);
        overlay(&mut self.delivery.api_key, &cli.getnote_api_key);
    }

    /// Headlines substituted when every source comes back empty.
    ///
    /// Hot scores of an override are pulled into the allowed range.
    pub fn fallback_dataset(&self) -> Vec<NewsItem> {
        let Some(items) = &self.fallback else {
            return fallback::default_dataset();
        };
        items
            .iter()
            .cloned()
            .map(|mut item| {
                item.hot_score = clamp_hot_score(item.hot_score);
                item
            })
            .collect()
    }
}

fn overlay(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
        *target = Some(v.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.count, 10);
        assert_eq!(config.cache.duration_secs, 3600);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.sources.newsapi.base_url_or(NEWSAPI_BASE_URL), NEWSAPI_BASE_URL);
        assert!(config.sources.newsapi.key().is_none());
        assert!(config.sources.tianxing.key().is_none());
        assert_eq!(config.fallback_dataset().len(), 8);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let yaml = r#"
count: 6
cache:
  duration_secs: 60
sources:
  gnews:
    api_key: "  gkey  "
    base_url: http://localhost:9999
score_seed: 7
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.count, 6);
        assert_eq!(config.cache.duration_secs, 60);
        assert!(config.cache.path.ends_with("tech_news_cache.json"));
        assert_eq!(config.sources.gnews.key(), Some("gkey"));
        assert_eq!(
            config.sources.gnews.base_url_or(GNEWS_BASE_URL),
            "http://localhost:9999"
        );
        assert_eq!(config.sources.gnews.query_or("technology"), "technology");
        assert_eq!(config.sources.newsapi.base_url_or(NEWSAPI_BASE_URL), NEWSAPI_BASE_URL);
        assert_eq!(config.score_seed, Some(7));
    }

    #[test]
    fn test_fallback_override() {
        let yaml = r#"
fallback:
  - title: 本地备用新闻
    summary: 摘要
    source: Local
    category: 云计算
    hot_score: 77
    from_api: Mock
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let fallback = config.fallback_dataset();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].hot_score, 77);
    }

    #[test]
    fn test_fallback_override_scores_are_clamped() {
        let yaml = r#"
fallback:
  - title: Too hot
    summary: s
    source: Local
    hot_score: 150
    from_api: Mock
  - title: Too cold
    summary: s
    source: Local
    hot_score: 1
    from_api: Mock
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let scores: Vec<u32> = config.fallback_dataset().iter().map(|n| n.hot_score).collect();
        assert_eq!(scores, vec![98, 70]);
    }

    #[test]
    fn test_blank_key_disables_source() {
        let source = SourceConfig {
            api_key: Some("   ".to_string()),
            ..SourceConfig::default()
        };
        assert!(source.key().is_none());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "count: 3\noutput_dir: /tmp/digest\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.count, 3);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/digest"));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = AppConfig::from_yaml("count: 4").unwrap();
        let cli = Cli::parse_from([
            "tech_news_digest",
            "--count",
            "7",
            "--newsapi-key",
            "nkey",
            "--output-dir",
            "/tmp/out",
        ]);
        config.apply_cli(&cli);
        assert_eq!(config.count, 7);
        assert_eq!(config.sources.newsapi.key(), Some("nkey"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }
}
