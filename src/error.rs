//! Error types, one enum per concern.
//!
//! None of these reach the top-level caller from the aggregator: source and
//! cache errors are logged and absorbed there. Config and delivery errors
//! surface to the driver.

use crate::models::ApiTag;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single upstream provider call.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider has no API key configured.
    #[error("{0} has no API key configured")]
    MissingCredential(ApiTag),

    /// Network, TLS, timeout or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but reported an error in its payload.
    #[error("{api} API error: {message}")]
    Api { api: ApiTag, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {api}: {source}")]
    Deserialize {
        api: ApiTag,
        #[source]
        source: serde_json::Error,
    },

    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint for {api}: {source}")]
    Endpoint {
        api: ApiTag,
        #[source]
        source: url::ParseError,
    },
}

/// Failure reading or writing the news cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache file exists but is not a valid entry (corrupt or partial).
    #[error("cache entry at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure delivering the digest.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("local save failed at {path}: {source}")]
    LocalSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
