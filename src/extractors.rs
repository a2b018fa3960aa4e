//! Product page extraction
//!
//! Each field has its own [`Cascade`] of stages, evaluated independently:
//! structured data first, heuristic selectors second, last-resort scans
//! third. Site overrides fill whatever is left.

pub mod cascade;
pub mod description;
pub mod image;
pub mod name;
pub mod page;
pub mod price;
pub mod script;
pub mod structured;

pub use cascade::Cascade;
pub use page::Page;
pub use price::parse_price_text;

use url::Url;

use crate::config::ExtractorConfig;
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::error::{ExtractError, FetchError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::overrides::OverrideRegistry;
use crate::product::ProductData;

/// Extracts product details from arbitrary e-commerce pages.
///
/// Holds no mutable state; one instance can serve concurrent callers.
pub struct Extractor {
    fetcher: Box<dyn Fetcher>,
    overrides: OverrideRegistry,
    diagnostics: Box<dyn DiagnosticSink>,
    name: Cascade<String>,
    price: Cascade<f64>,
    image: Cascade<String>,
    description: Cascade<String>,
}

impl Extractor {
    /// Extractor with an HTTP fetcher and the built-in site overrides
    pub fn new(config: ExtractorConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Extractor using a custom page source
    pub fn with_fetcher(config: ExtractorConfig, fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            overrides: OverrideRegistry::with_defaults(),
            diagnostics: Box::new(NoopSink),
            name: name::cascade(),
            price: price::cascade(),
            image: image::cascade(),
            description: description::cascade(config.description_max_len),
        }
    }

    /// Replace the site override registry
    pub fn with_overrides(mut self, overrides: OverrideRegistry) -> Self {
        self.overrides = overrides;
        self
    }

    /// Send every fetched document to `sink`
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// Fetch `url` and extract product details.
    ///
    /// Fetch failures and heuristic misses degrade to partial data. The only
    /// error is a URL that is not an absolute http(s) URL.
    pub fn extract(&self, url: &str) -> Result<ProductData, ExtractError> {
        let url = parse_product_url(url).inspect_err(|e| log::error!("{}", e))?;

        match self.fetcher.fetch(&url) {
            Ok(html) => {
                self.diagnostics.record_document(&url, &html);
                Ok(self.extract_from_html(&url, &html))
            }
            Err(e) => {
                log::warn!("fetch failed, falling back: {}", e);
                Ok(self.fallback(&url))
            }
        }
    }

    /// Extract product details from an already fetched document
    pub fn extract_from_html(&self, url: &Url, html: &str) -> ProductData {
        let page = Page::parse(url.clone(), html);

        let mut data = ProductData {
            price: self.price.evaluate(&page),
            image_url: self.image.evaluate(&page),
            description: self.description.evaluate(&page),
            ..ProductData::default()
        };
        if let Some(name) = self.name.evaluate(&page) {
            data.name = name;
        }

        if data.has_gaps() {
            if let Some(site) = self.overrides.find(url) {
                site.apply(url, Some(&page), &mut data);
            }
        }

        data
    }

    /// Result for a page that could not be fetched
    fn fallback(&self, url: &Url) -> ProductData {
        let mut data = ProductData::default();
        match self.overrides.find(url) {
            Some(site) => site.apply(url, None, &mut data),
            None => {
                data.description = Some(format!("Could not extract product details from {url}"));
            }
        }
        data
    }
}

fn parse_product_url(raw: &str) -> Result<Url, ExtractError> {
    let url = Url::parse(raw.trim()).map_err(|source| ExtractError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ExtractError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}
