//! [NewsAPI](https://newsapi.org/) provider.
//!
//! Queries the `everything` endpoint for English articles published since
//! yesterday, newest first. The free plan only serves the last day, hence
//! the fixed `from` window.

use super::{NewsSource, endpoint, get_json};
use crate::config::{NEWSAPI_BASE_URL, SourceConfig};
use crate::error::SourceError;
use crate::models::{ApiTag, RawArticle};
use async_trait::async_trait;
use chrono::{Duration, Local};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

const DEFAULT_QUERY: &str = "technology AI";
const PAGE_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<ArticleSource>,
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
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

/// NewsAPI `everything` search.
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    query: String,
}

impl NewsApiSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            api_key: config.key().map(str::to_string),
            base_url: config.base_url_or(NEWSAPI_BASE_URL).to_string(),
            query: config.query_or(DEFAULT_QUERY).to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn tag(&self) -> ApiTag {
        ApiTag::NewsApi
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
            .ok_or(SourceError::MissingCredential(ApiTag::NewsApi))?;
        let yesterday = (Local::now() - Duration::days(1)).format("%Y-%m-%d").to_string();

        let url = endpoint(
            ApiTag::NewsApi,
            &self.base_url,
            "everything",
            &[
                ("q", self.query.clone()),
                ("from", yesterday),
                ("sortBy", "publishedAt".to_string()),
                ("language", "en".to_string()),
                ("pageSize", count.min(PAGE_LIMIT).to_string()),
                ("apiKey", api_key.to_string()),
            ],
        )?;

        let response: NewsApiResponse = get_json(&self.client, ApiTag::NewsApi, url).await?;
        if response.status != "ok" {
            return Err(SourceError::Api {
                api: ApiTag::NewsApi,
                message: response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

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

        info!(count = articles.len(), "NewsAPI fetch succeeded");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(base_url: &str, key: Option<&str>) -> NewsApiSource {
        let client = crate::sources::http_client(StdDuration::from_secs(5)).unwrap();
        NewsApiSource::new(
            client,
            &SourceConfig {
                api_key: key.map(str::to_string),
                base_url: Some(base_url.to_string()),
                query: None,
            },
        )
    }

    #[tokio::test]
    async fn test_fetch_parses_articles() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": { "id": null, "name": "The Verge" },
                    "title": "Nvidia unveils new GPU",
                    "description": "Faster training",
                    "content": "Long body [+1200 chars]",
                    "url": "https://example.com/gpu",
                    "publishedAt": "2025-05-06T10:00:00Z"
                },
                {
                    "source": { "id": null, "name": null },
                    "title": "Untitled source",
                    "description": null,
                    "url": "https://example.com/2",
                    "publishedAt": "2025-05-06T09:00:00Z"
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "technology AI"))
            .and(query_param("language", "en"))
            .and(query_param("pageSize", "5"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let articles = source(&server.uri(), Some("test-key")).fetch(5).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Nvidia unveils new GPU");
        assert_eq!(articles[0].source_name.as_deref(), Some("The Verge"));
        assert_eq!(articles[0].published_at.as_deref(), Some("2025-05-06T10:00:00Z"));
        assert!(articles[1].description.is_none());
        assert!(articles[1].source_name.is_none());
    }

    #[tokio::test]
    async fn test_error_status_in_payload_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "code": "rateLimited",
                "message": "You have made too many requests"
            })))
            .mount(&server)
            .await;

        let err = source(&server.uri(), Some("k")).fetch(5).await.unwrap_err();
        match err {
            SourceError::Api { api, message } => {
                assert_eq!(api, ApiTag::NewsApi);
                assert!(message.contains("too many requests"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_http_failure_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("apiKeyInvalid"))
            .mount(&server)
            .await;

        let err = source(&server.uri(), Some("bad")).fetch(5).await.unwrap_err();
        assert!(matches!(err, SourceError::Api { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let src = source(&server.uri(), None);
        assert!(!src.is_configured());
        let err = src.fetch(5).await.unwrap_err();
        assert!(matches!(err, SourceError::MissingCredential(ApiTag::NewsApi)));
    }
}
