//! Product page retrieval

use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::FetchError;

/// Source of product page HTML
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher presenting itself as a desktop browser.
///
/// One GET per call with a fixed timeout; no retries. Accept-Encoding is
/// advertised by reqwest itself (gzip, br, deflate) so bodies are decoded.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(browser_headers(config))
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

fn browser_headers(config: &ExtractorConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(accept) = HeaderValue::from_str(&config.accept) {
        headers.insert(header::ACCEPT, accept);
    }
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(header::ACCEPT_LANGUAGE, language);
    }
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.as_str()).send().map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| request_error(url, e))
    }
}

/// Fetcher for when no HTTP client could be built; every fetch fails
pub struct Unavailable;

impl Fetcher for Unavailable {
    fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        Err(FetchError::Unavailable)
    }
}

fn request_error(url: &Url, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source,
        }
    }
}
