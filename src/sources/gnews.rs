//! [GNews](https://gnews.io/) provider.
//!
//! The free plan caps a search at 10 articles per request.

use super::{NewsSource, endpoint, get_json};
use crate::config::{GNEWS_BASE_URL, SourceConfig};
use crate::error::SourceError;
use crate::models::{ApiTag, RawArticle};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

const DEFAULT_QUERY: &str = "technology";
const PAGE_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GNewsArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<GNewsPublisher>,
}

#[derive(Debug, Deserialize)]
struct GNewsPublisher {
    #[serde(default)]
    name: Option<String>,
}

/// GNews `search` endpoint.
#[derive(Debug, Clone)]
pub struct GNewsSource {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    query: String,
}

impl GNewsSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            api_key: config.key().map(str::to_string),
            base_url: config.base_url_or(GNEWS_BASE_URL).to_string(),
            query: config.query_or(DEFAULT_QUERY).to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for GNewsSource {
    fn tag(&self) -> ApiTag {
        ApiTag::GNews
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn page_limit(&self) -> usize {
        PAGE_LIMIT
    }

    #[instrument(level = "info", skip(self), fields(query = %self.query))]
    async fn fetch(&self, count: usize) -> Result<Vec<RawArticle>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential(ApiTag::GNews))?;

        let url = endpoint(
            ApiTag::GNews,
            &self.base_url,
            "search",
            &[
                ("q", self.query.clone()),
                ("lang", "en".to_string()),
                ("max", count.min(PAGE_LIMIT).to_string()),
                ("apikey", api_key.to_string()),
            ],
        )?;

        let response: GNewsResponse = get_json(&self.client, ApiTag::GNews, url).await?;
        let articles: Vec<RawArticle> = response
            .articles
            .into_iter()
            .map(|a| RawArticle {
                title: a.title.unwrap_or_default(),
                description: a.description,
                content: a.content,
                source_name: a.source.and_then(|s| s.name),
                url: a.url,
                published_at: a.published_at,
                hot_score: None,
            })
            .collect();

        info!(count = articles.len(), "GNews fetch succeeded");
        Ok(articles)
    }
}
