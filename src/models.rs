//! Data models for headlines as they flow through the pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: An article as returned by an upstream news API
//! - [`NewsItem`]: A normalized, categorized and scored headline
//! - [`Category`]: The closed set of topic labels
//! - [`ApiTag`]: Which upstream produced an item
//! - [`CacheEntry`]: The single-slot cache payload
//!
//! Field names and label strings match the cache file layout, so items
//! written by an earlier run can be read back unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Lowest hot score any item may carry.
pub const MIN_HOT_SCORE: u32 = 70;
/// Highest hot score any item may carry.
pub const MAX_HOT_SCORE: u32 = 98;

/// Pull `score` into `[MIN_HOT_SCORE, MAX_HOT_SCORE]`.
pub fn clamp_hot_score(score: u32) -> u32 {
    score.clamp(MIN_HOT_SCORE, MAX_HOT_SCORE)
}

/// An article as returned by an upstream provider, before normalization.
///
/// Providers fill in whatever they have; the aggregator derives the
/// summary, category and score from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    /// Headline text.
    pub title: String,
    /// Short description, if the provider sends one.
    pub description: Option<String>,
    /// Article body or body excerpt.
    pub content: Option<String>,
    /// Publisher name.
    pub source_name: Option<String>,
    /// Canonical article link.
    pub url: Option<String>,
    /// Provider timestamp, passed through verbatim.
    pub published_at: Option<String>,
    /// Native popularity signal, when the provider has one.
    pub hot_score: Option<u32>,
}

/// Topic label assigned to every headline.
///
/// Declaration order is the categorizer's scan order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "人工智能")]
    Ai,
    #[serde(rename = "芯片")]
    Chip,
    #[serde(rename = "自动驾驶")]
    AutonomousDriving,
    #[serde(rename = "硬件设备")]
    Hardware,
    #[serde(rename = "元宇宙")]
    Metaverse,
    #[serde(rename = "航天")]
    Aerospace,
    #[serde(rename = "区块链")]
    Blockchain,
    #[serde(rename = "云计算")]
    Cloud,
    #[default]
    #[serde(rename = "科技")]
    Tech,
}

impl Category {
    /// Human-facing label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Category::Ai => "人工智能",
            Category::Chip => "芯片",
            Category::AutonomousDriving => "自动驾驶",
            Category::Hardware => "硬件设备",
            Category::Metaverse => "元宇宙",
            Category::Aerospace => "航天",
            Category::Blockchain => "区块链",
            Category::Cloud => "云计算",
            Category::Tech => "科技",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which keyword table applies to a provider's titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// English headlines, matched case-insensitively.
    Latin,
    /// Chinese headlines, matched exactly.
    Cjk,
}

/// Tag recording which upstream produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiTag {
    #[serde(rename = "NewsAPI")]
    NewsApi,
    #[serde(rename = "GNews")]
    GNews,
    #[serde(rename = "TianXing")]
    TianXing,
    /// Built-in fallback data.
    #[serde(rename = "Mock")]
    Mock,
}

impl ApiTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiTag::NewsApi => "NewsAPI",
            ApiTag::GNews => "GNews",
            ApiTag::TianXing => "TianXing",
            ApiTag::Mock => "Mock",
        }
    }

    /// Keyword table used to categorize this provider's titles.
    pub fn script(self) -> Script {
        match self {
            ApiTag::TianXing => Script::Cjk,
            _ => Script::Latin,
        }
    }

    /// Range random scores are drawn from when the provider has no ranking.
    pub fn score_range(self) -> RangeInclusive<u32> {
        match self {
            ApiTag::TianXing => MIN_HOT_SCORE..=95,
            _ => MIN_HOT_SCORE..=MAX_HOT_SCORE,
        }
    }

    /// Publisher name used when an article carries none.
    pub fn default_publisher(self) -> &'static str {
        match self {
            ApiTag::TianXing => "科技资讯",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ApiTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized headline, ready for ranking, rendering and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline; also the de-duplication key.
    pub title: String,
    /// Short summary derived from the description or body.
    pub summary: String,
    /// Publisher name.
    pub source: String,
    /// Topic label.
    #[serde(default)]
    pub category: Category,
    /// Popularity proxy in `[70, 98]`, used only for ordering.
    pub hot_score: u32,
    /// Article link; empty for fallback items.
    #[serde(default)]
    pub url: String,
    /// Provider timestamp; empty for fallback items.
    #[serde(default)]
    pub published_at: String,
    /// Provider that produced the item.
    pub from_api: ApiTag,
}

/// Contents of the single-slot news cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix seconds at which the entry was written.
    pub timestamp: f64,
    /// Full sorted result of the aggregation that wrote the entry.
    pub news: Vec<NewsItem>,
}

impl CacheEntry {
    /// `true` while the entry is younger than `ttl_secs` at `now`.
    pub fn is_fresh(&self, now: f64, ttl_secs: u64) -> bool {
        now - self.timestamp < ttl_secs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> NewsItem {
        NewsItem {
            title: "Test Article".to_string(),
            summary: "Summary here".to_string(),
            source: "Example".to_string(),
            category: Category::Chip,
            hot_score: 91,
            url: "https://example.com/a".to_string(),
            published_at: "2025-05-06T14:30:00Z".to_string(),
            from_api: ApiTag::GNews,
        }
    }

    #[test]
    fn test_news_item_serializes_localized_labels() {
        let json = serde_json::to_string(&sample_item()).unwrap();
        assert!(json.contains(r#""category":"芯片""#));
        assert!(json.contains(r#""from_api":"GNews""#));
        assert!(json.contains(r#""hot_score":91"#));
    }

    #[test]
    fn test_news_item_deserializes_without_optional_fields() {
        let json = r#"{
            "title": "SpaceX星舰第五次试飞成功",
            "summary": "星舰成功完成第五次轨道试飞",
            "source": "SpaceNews",
            "category": "航天",
            "hot_score": 80,
            "from_api": "Mock"
        }"#;

        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, Category::Aerospace);
        assert_eq!(item.from_api, ApiTag::Mock);
        assert!(item.url.is_empty());
        assert!(item.published_at.is_empty());
    }

    #[test]
    fn test_category_label_matches_serde() {
        for cat in [Category::Ai, Category::Cloud, Category::Tech] {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.label()));
        }
        assert_eq!(Category::default(), Category::Tech);
    }

    #[test]
    fn test_api_tag_properties() {
        assert_eq!(ApiTag::TianXing.script(), Script::Cjk);
        assert_eq!(ApiTag::NewsApi.script(), Script::Latin);
        assert_eq!(*ApiTag::TianXing.score_range().end(), 95);
        assert_eq!(*ApiTag::GNews.score_range().end(), MAX_HOT_SCORE);
        assert_eq!(ApiTag::TianXing.default_publisher(), "科技资讯");
        assert_eq!(ApiTag::Mock.to_string(), "Mock");
    }

    #[test]
    fn test_cache_entry_freshness() {
        let entry = CacheEntry {
            timestamp: 1_000.0,
            news: vec![sample_item()],
        };
        assert!(entry.is_fresh(1_000.0, 3600));
        assert!(entry.is_fresh(4_599.9, 3600));
        assert!(!entry.is_fresh(4_600.0, 3600));
    }
}
