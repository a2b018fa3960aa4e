//! Product name extraction

use super::cascade::Cascade;
use super::page::{element_text, Page};
use super::structured;

pub const NAME_SELECTORS: &[&str] = &[
    r#"h1[itemprop="name"]"#,
    r#"[itemprop="name"]"#,
    ".product-name",
    ".product-title",
    "#product-name",
    "#productTitle",
    "h1",
];

/// Build the name cascade
pub fn cascade() -> Cascade<String> {
    Cascade::new("name")
        .stage("structured-data", |page: &Page| structured::product_text(page, "name"))
        .stage("open-graph", |page: &Page| structured::meta_content(page, &["og:title"]))
        .stage("selectors", selector_name)
        .stage("title", title_name)
}

fn selector_name(page: &Page) -> Option<String> {
    NAME_SELECTORS.iter().find_map(|selector| {
        page.select(selector)
            .iter()
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

fn title_name(page: &Page) -> Option<String> {
    let title = element_text(&page.select_first("title")?);
    // "Product | Store" and "Product - Store"
    let name = title
        .split(" | ")
        .next()
        .and_then(|s| s.split(" - ").next())
        .unwrap_or(&title)
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://example.com/p/1").unwrap(), html)
    }

    #[test]
    fn test_jsonld_name_first() {
        let html = r#"
        <meta property="og:title" content="OG Title">
        <script type="application/ld+json">{"@type": "Product", "name": "Trail Runner 2"}</script>
        <h1>Heading</h1>"#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "Trail Runner 2");
    }

    #[test]
    fn test_heading_fallback() {
        let html = r#"<body><h1 class="product-title">  Cast Iron
            Skillet </h1></body>"#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "Cast Iron Skillet");
    }

    #[test]
    fn test_title_suffix_stripped() {
        let html = r#"<head><title>Walnut Cutting Board | Kitchen Co</title></head>"#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "Walnut Cutting Board");
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(cascade().evaluate(&page("<div></div>")), None);
    }
}
