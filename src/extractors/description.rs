//! Product description extraction

use super::cascade::Cascade;
use super::page::{element_text, Page};
use super::structured;

/// Description selectors, tried in order. `meta[name="description"]` is read
/// from its `content` attribute instead of its text.
pub const DESCRIPTION_SELECTORS: &[&str] = &[
    r#"[itemprop="description"]"#,
    ".product-description",
    "#product-description",
    ".product-details__description",
    ".description",
    "#description",
    ".product-info",
    r#"meta[name="description"]"#,
];

const ELLIPSIS: &str = "...";

/// Build the description cascade, capped at `max_len` characters
pub fn cascade(max_len: usize) -> Cascade<String> {
    Cascade::new("description")
        .stage("selectors", move |page: &Page| {
            selector_description(page).map(|text| truncate_description(&text, max_len))
        })
}

fn selector_description(page: &Page) -> Option<String> {
    DESCRIPTION_SELECTORS.iter().find_map(|selector| {
        if selector.starts_with("meta") {
            return structured::meta_content(page, &["description"]);
        }
        page.select(selector)
            .iter()
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// Cap `text` at `max_len` characters; over-long text keeps its first
/// `max_len - 3` characters followed by `...`. Caps shorter than the
/// ellipsis cut the text without one.
pub fn truncate_description(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len < ELLIPSIS.len() {
        return text.chars().take(max_len).collect();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://example.com/p/1").unwrap(), html)
    }

    #[test]
    fn test_truncate_description() {
        let long = "x".repeat(800);
        let truncated = truncate_description(&long, 500);
        assert_eq!(truncated.chars().count(), 500);
        assert!(truncated.ends_with("..."));
        assert_eq!(&truncated[..497], &long[..497]);

        let exact = "y".repeat(500);
        assert_eq!(truncate_description(&exact, 500), exact);
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "é".repeat(10);
        assert_eq!(truncate_description(&text, 5), "éé...");
    }

    #[test]
    fn test_truncate_below_ellipsis_length() {
        assert_eq!(truncate_description("abcdef", 2), "ab");
        assert_eq!(truncate_description("abcdef", 0), "");
        assert_eq!(truncate_description("abcdef", 3), "...");
    }

    #[test]
    fn test_itemprop_before_meta() {
        let html = r#"
        <meta name="description" content="Shop our store">
        <div itemprop="description">
            Hand-thrown   stoneware mug.
        </div>"#;
        assert_eq!(cascade(500).evaluate(&page(html)).unwrap(), "Hand-thrown stoneware mug.");
    }

    #[test]
    fn test_meta_description_fallback() {
        let html = r#"<head><meta name="description" content="A warm wool blanket."></head>"#;
        assert_eq!(cascade(500).evaluate(&page(html)).unwrap(), "A warm wool blanket.");
    }

    #[test]
    fn test_empty_elements_skipped() {
        let html = r#"<div class="product-description"> </div><div id="description">Fits true to size.</div>"#;
        assert_eq!(cascade(500).evaluate(&page(html)).unwrap(), "Fits true to size.");
    }

    #[test]
    fn test_long_description_truncated() {
        let html = format!(r#"<div class="description">{}</div>"#, "word ".repeat(200));
        let description = cascade(500).evaluate(&page(&html)).unwrap();
        assert_eq!(description.chars().count(), 500);
        assert!(description.ends_with("..."));
    }
}
