//! Error types
//!
//! Only `ExtractError` ever reaches a caller of [`crate::Extractor::extract`].
//! Fetch failures are absorbed by the extractor and turned into a degraded
//! result; selector and structured-data misses are plain `None`s.

use thiserror::Error;

/// Failure to retrieve a product page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no HTTP client available")]
    Unavailable,
}

/// Fatal extraction error: the caller broke the input contract
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid product URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {scheme:?} in {url:?}")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Failure to load an [`crate::ExtractorConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
