//! [TianXing](https://www.tianapi.com/) Chinese technology news provider.
//!
//! Success is signalled in the payload (`code == 200`), not by HTTP status.
//! Titles from this feed are categorized with the CJK keyword table.

use super::{NewsSource, endpoint, get_json};
use crate::config::{SourceConfig, TIANXING_URL};
use crate::error::SourceError;
use crate::models::{ApiTag, RawArticle};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

const PAGE_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
struct TianXingResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    newslist: Vec<TianXingArticle>,
}

#[derive(Debug, Deserialize)]
struct TianXingArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    ctime: Option<String>,
}

/// TianXing `keji` (technology) feed.
#[derive(Debug, Clone)]
pub struct TianXingSource {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl TianXingSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            api_key: config.key().map(str::to_string),
            url: config.base_url_or(TIANXING_URL).to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for TianXingSource {
    fn tag(&self) -> ApiTag {
        ApiTag::TianXing
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn page_limit(&self) -> usize {
        PAGE_LIMIT
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, count: usize) -> Result<Vec<RawArticle>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential(ApiTag::TianXing))?;

        let url = endpoint(
            ApiTag::TianXing,
            &self.url,
            "",
            &[
                ("key", api_key.to_string()),
                ("num", count.min(PAGE_LIMIT).to_string()),
            ],
        )?;

        let response: TianXingResponse = get_json(&self.client, ApiTag::TianXing, url).await?;
        if response.code != 200 {
            return Err(SourceError::Api {
                api: ApiTag::TianXing,
                message: response.msg.unwrap_or_else(|| "Unknown".to_string()),
            });
        }

        let articles: Vec<RawArticle> = response
            .newslist
            .into_iter()
            .map(|a| RawArticle {
                title: a.title.unwrap_or_default(),
                description: a.description,
                content: None,
                source_name: a.source,
                url: a.url,
                published_at: a.ctime,
                hot_score: None,
            })
            .collect();

        info!(count = articles.len(), "TianXing fetch succeeded");
        Ok(articles)
    }
}
