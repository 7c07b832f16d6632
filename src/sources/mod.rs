//! Upstream news providers.
//!
//! Each provider is a [`NewsSource`]: given how many items are still wanted,
//! it makes exactly one HTTP request and returns raw articles or a
//! [`SourceError`]. Providers never categorize or score; the aggregator
//! does that uniformly.
//!
//! # Supported Sources
//!
//! | Priority | Source | Module | Page limit | Notes |
//! |----------|--------|--------|------------|-------|
//! | 1 | NewsAPI | [`newsapi`] | 100 | `everything` endpoint, last 24 hours |
//! | 2 | GNews | [`gnews`] | 10 | `search` endpoint |
//! | 3 | TianXing | [`tianxing`] | 20 | Chinese tech feed |
//!
//! A provider without an API key reports itself as unconfigured and is
//! skipped by the aggregator without a request being made.

pub mod gnews;
pub mod newsapi;
pub mod tianxing;

use crate::config::AppConfig;
use crate::error::SourceError;
use crate::models::{ApiTag, RawArticle};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// One upstream news provider.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Tag stamped on every item this provider produces.
    fn tag(&self) -> ApiTag;

    /// `false` when credentials are missing; the provider is then skipped.
    fn is_configured(&self) -> bool;

    /// Largest number of articles one request may ask for.
    fn page_limit(&self) -> usize {
        usize::MAX
    }

    /// Fetch up to `count` articles.
    async fn fetch(&self, count: usize) -> Result<Vec<RawArticle>, SourceError>;
}

/// Build the HTTP client shared by all providers.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// All providers from `config`, in priority order.
pub fn from_config(config: &AppConfig, client: &Client) -> Vec<Box<dyn NewsSource>> {
    vec![
        Box::new(newsapi::NewsApiSource::new(client.clone(), &config.sources.newsapi)),
        Box::new(gnews::GNewsSource::new(client.clone(), &config.sources.gnews)),
        Box::new(tianxing::TianXingSource::new(client.clone(), &config.sources.tianxing)),
    ]
}

/// Join `path` onto `base` and attach query parameters.
pub(crate) fn endpoint(
    api: ApiTag,
    base: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<Url, SourceError> {
    let raw = if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path)
    };
    Url::parse_with_params(&raw, params).map_err(|source| SourceError::Endpoint { api, source })
}

/// GET `url` and decode a JSON body; non-2xx statuses become [`SourceError::Api`].
///
/// Transport errors have their URL stripped, since every provider puts its
/// key in the query string.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    api: ApiTag,
    url: Url,
) -> Result<T, SourceError> {
    let response = client.get(url).send().await.map_err(reqwest::Error::without_url)?;
    let status = response.status();
    let body = response.text().await.map_err(reqwest::Error::without_url)?;

    if !status.is_success() {
        debug!(%api, %status, body = %truncate_for_log(&body, 200), "Provider returned non-success status");
        return Err(SourceError::Api {
            api,
            message: format!("HTTP {status}: {}", truncate_for_log(&body, 200)),
        });
    }
    serde_json::from_str(&body).map_err(|source| SourceError::Deserialize { api, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_in_priority_order() {
        let client = http_client(Duration::from_secs(1)).unwrap();
        let sources = from_config(&AppConfig::default(), &client);
        let tags: Vec<ApiTag> = sources.iter().map(|s| s.tag()).collect();
        assert_eq!(tags, vec![ApiTag::NewsApi, ApiTag::GNews, ApiTag::TianXing]);
        assert!(sources.iter().all(|s| !s.is_configured()));
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let url = endpoint(
            ApiTag::GNews,
            "https://gnews.io/api/v4/",
            "search",
            &[("q", "technology AI".to_string()), ("max", "5".to_string())],
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://gnews.io/api/v4/search?q=technology+AI&max=5");
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_query_string() {
        let client = http_client(Duration::from_secs(2)).unwrap();
        let url = endpoint(
            ApiTag::NewsApi,
            "http://127.0.0.1:1",
            "everything",
            &[("apiKey", "SECRET-KEY-123".to_string())],
        )
        .unwrap();

        let err = get_json::<serde_json::Value>(&client, ApiTag::NewsApi, url)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        let err = endpoint(ApiTag::NewsApi, "not a url", "everything", &[]).unwrap_err();
        assert!(matches!(err, SourceError::Endpoint { .. }));
    }
}
