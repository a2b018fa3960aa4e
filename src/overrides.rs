//! Per-site gap-filling strategies
//!
//! A site override is consulted after the generic cascades, and only when
//! the URL matches and a field is still unresolved. Its guesses are merged
//! with [`ProductData::fill_gaps`], so it can never replace a value the
//! generic pipeline found.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::extractors::Page;
use crate::product::{FieldGuesses, ProductData, UNKNOWN_PRODUCT_NAME};

type Matcher = Box<dyn Fn(&Url) -> bool + Send + Sync>;

/// Gap-filling strategy. `page` is `None` when the document could not be
/// fetched.
type Strategy = Box<dyn Fn(&Url, Option<&Page>, &ProductData) -> FieldGuesses + Send + Sync>;

pub struct SiteOverride {
    name: &'static str,
    matcher: Matcher,
    strategy: Strategy,
}

impl SiteOverride {
    pub fn new<M, S>(name: &'static str, matcher: M, strategy: S) -> Self
    where
        M: Fn(&Url) -> bool + Send + Sync + 'static,
        S: Fn(&Url, Option<&Page>, &ProductData) -> FieldGuesses + Send + Sync + 'static,
    {
        Self {
            name,
            matcher: Box::new(matcher),
            strategy: Box::new(strategy),
        }
    }

    /// Override for URLs whose text contains `pattern`
    pub fn for_url_containing<S>(name: &'static str, pattern: &'static str, strategy: S) -> Self
    where
        S: Fn(&Url, Option<&Page>, &ProductData) -> FieldGuesses + Send + Sync + 'static,
    {
        Self::new(name, move |url: &Url| url.as_str().contains(pattern), strategy)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, url: &Url) -> bool {
        (self.matcher)(url)
    }

    /// Fill unresolved fields of `data`
    pub fn apply(&self, url: &Url, page: Option<&Page>, data: &mut ProductData) {
        let guesses = (self.strategy)(url, page, data);
        log::debug!("applying '{}' site override to {}", self.name, url);
        data.fill_gaps(guesses);
    }
}

/// Ordered collection of site overrides; the first matching entry is used
#[derive(Default)]
pub struct OverrideRegistry {
    entries: Vec<SiteOverride>,
}

impl OverrideRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in retailer overrides
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(abercrombie::site_override());
        registry
    }

    pub fn register(&mut self, entry: SiteOverride) {
        self.entries.push(entry);
    }

    pub fn find(&self, url: &Url) -> Option<&SiteOverride> {
        self.entries.iter().find(|entry| entry.matches(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Abercrombie & Fitch product pages
///
/// Their pages are rendered client-side and often answer bots with a
/// challenge page, so the URL itself is the most reliable source.
pub mod abercrombie {
    use super::*;

    pub const URL_PATTERN: &str = "abercrombie.com";
    pub const DEFAULT_PRICE: f64 = 70.0;
    pub const DEFAULT_IMAGE_URL: &str = "https://img.abercrombie.com/is/image/anf/anf-logo.png";

    const MIN_IMAGE_SRC_LEN: usize = 30;
    const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

    static PRODUCT_PATH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"p/([A-Za-z0-9-]+)-(\d+)").expect("valid product path pattern"));

    pub fn site_override() -> SiteOverride {
        SiteOverride::for_url_containing("abercrombie", URL_PATTERN, guesses)
    }

    /// Slug and numeric product id from a `.../p/<slug>-<id>` path
    pub fn slug_and_id(url: &Url) -> Option<(String, String)> {
        let caps = PRODUCT_PATH.captures(url.path())?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    /// `"oversized-essential-hoodie"` -> `"Oversized Essential Hoodie"`
    pub fn title_from_slug(slug: &str) -> String {
        slug.split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn guesses(url: &Url, page: Option<&Page>, current: &ProductData) -> FieldGuesses {
        let slug_id = slug_and_id(url);

        let name = if current.has_name() {
            current.name.clone()
        } else {
            slug_id
                .as_ref()
                .map(|(slug, _)| title_from_slug(slug))
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| current.name.clone())
        };

        let image_url = match page {
            Some(page) => scan_images(page, slug_id.as_ref().map(|(_, id)| id.as_str())),
            None => Some(DEFAULT_IMAGE_URL.to_string()),
        };

        let description = (name != UNKNOWN_PRODUCT_NAME)
            .then(|| format!("{name} from Abercrombie & Fitch."));

        FieldGuesses {
            description,
            name: Some(name),
            price: Some(DEFAULT_PRICE),
            image_url,
        }
    }

    fn scan_images(page: &Page, product_id: Option<&str>) -> Option<String> {
        let lazy = page.select("img[data-src]").into_iter().find_map(|img| {
            let data_src = img.value().attr("data-src")?;
            let relevant = data_src.contains("product")
                || product_id.is_some_and(|id| data_src.contains(id));
            if relevant {
                page.resolve(data_src)
            } else {
                None
            }
        });
        if lazy.is_some() {
            return lazy;
        }

        page.select("img[src]").into_iter().find_map(|img| {
            let src = img.value().attr("src")?;
            let lower = src.to_lowercase();
            if src.len() > MIN_IMAGE_SRC_LEN && IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
                page.resolve(src)
            } else {
                None
            }
        })
    }
}
