//! Price extraction
//!
//! Stages, most reliable first: schema.org structured data, price meta tags,
//! inline script state, and finally price selectors inside the main product
//! container.

use once_cell::sync::Lazy;
use regex::Regex;

use super::cascade::Cascade;
use super::page::{element_text, non_empty_attr, select_within, Page};
use super::{script, structured};

/// Meta properties carrying a price amount
pub const PRICE_META_KEYS: &[&str] = &["product:price:amount", "og:price:amount"];

/// Selectors for the main product container, tried in order
pub const PRODUCT_CONTAINER_SELECTORS: &[&str] = &[
    r#"[itemtype*="schema.org/Product"]"#,
    "#product",
    ".product-detail",
    ".product-details",
    ".product-main",
    ".product-info",
    ".product-single",
    "main .product",
    "main",
];

/// Attributes holding a machine-readable price, read before the element text
pub const PRICE_ATTRIBUTES: &[&str] = &["content", "data-price"];

/// Price selectors searched inside the product container
pub const PRICE_SELECTORS: &[&str] = &[
    r#"[itemprop="price"]"#,
    "[data-price]",
    ".product-price",
    ".price-current",
    ".current-price",
    ".sale-price",
    ".offer-price",
    ".price",
    "#price",
    "span.amount",
];

static PRICE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[$€£¥₹]|USD|EUR|GBP|CAD|AUD)?\s*(\d[\d.,]*)").expect("valid price text pattern")
});

/// Build the price cascade
pub fn cascade() -> Cascade<f64> {
    Cascade::new("price")
        .stage("structured-data", structured_data_price)
        .stage("meta", meta_price)
        .stage("inline-script", script::script_price)
        .stage("product-region", region_price)
}

fn structured_data_price(page: &Page) -> Option<f64> {
    structured::products(page).iter().find_map(structured::offer_price)
}

fn meta_price(page: &Page) -> Option<f64> {
    PRICE_META_KEYS.iter().find_map(|key| {
        structured::meta_content(page, &[*key]).and_then(|content| parse_price_text(&content))
    })
}

fn region_price(page: &Page) -> Option<f64> {
    let container = PRODUCT_CONTAINER_SELECTORS
        .iter()
        .find_map(|selector| page.select_first(selector));

    PRICE_SELECTORS.iter().find_map(|selector| {
        let candidates = match container {
            Some(scope) => select_within(scope, selector),
            None => page.select(selector),
        };
        candidates.iter().find_map(|element| {
            PRICE_ATTRIBUTES
                .iter()
                .filter_map(|attr| non_empty_attr(element, *attr))
                .find_map(parse_price_text)
                .or_else(|| parse_price_text(&element_text(element)))
        })
    })
}

/// Parse a price out of free text such as `"$1,234.56"` or `"1234,56 €"`.
///
/// When both `,` and `.` appear the comma is a thousands separator; a lone
/// comma is a decimal separator.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let caps = PRICE_TEXT.captures(text)?;
    let number = caps.get(1)?.as_str().trim_end_matches(['.', ',']);

    let normalized = if number.contains(',') && number.contains('.') {
        number.replace(',', "")
    } else if number.contains(',') {
        number.replace(',', ".")
    } else {
        number.to_string()
    };

    normalized.parse::<f64>().ok().filter(|p| p.is_finite())
}
