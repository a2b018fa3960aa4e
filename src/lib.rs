//! Product detail scraper for the wishlist service
//!
//! Given a product page URL, extracts name, price, image and description:
//! - JSON-LD (schema.org Product, with @graph support)
//! - Price meta tags and OpenGraph
//! - Inline script state (via ECMAScript AST parsing)
//! - CSS selector heuristics
//! - Per-site gap-filling overrides

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod overrides;
pub mod product;
pub mod wishlist;

pub use config::ExtractorConfig;
pub use error::{ConfigError, ExtractError, FetchError};
pub use extractors::Extractor;
pub use product::{ProductData, UNKNOWN_PRODUCT_NAME};

/// Extract product details from `url` with the default configuration
pub fn extract(url: &str) -> Result<ProductData, ExtractError> {
    match Extractor::new(ExtractorConfig::default()) {
        Ok(extractor) => extractor.extract(url),
        Err(e) => {
            // No HTTP client: behave as if the fetch itself failed
            log::warn!("{}", e);
            let extractor = Extractor::with_fetcher(ExtractorConfig::default(), fetch::Unavailable);
            extractor.extract(url)
        }
    }
}
