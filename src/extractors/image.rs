//! Product image extraction

use scraper::ElementRef;

use super::cascade::Cascade;
use super::page::{non_empty_attr, Page};

/// Image selectors, most specific first
pub const IMAGE_SELECTORS: &[&str] = &[
    r#"[itemprop="image"]"#,
    ".product-image img",
    "img.product-image",
    "#product-image img",
    ".product-img img",
    ".product-gallery img",
    ".product-photo img",
    ".main-image img",
    ".gallery img",
    r#"img[id*="product"]"#,
    r#"img[class*="product"]"#,
];

/// Attributes that may hold the image URL, in priority order
pub const IMAGE_ATTRIBUTES: &[&str] = &[
    "src",
    "data-src",
    "data-lazy-src",
    "data-srcset",
    "data-lazy",
    "data-image",
    "srcset",
    "data-img-url",
];

const MIN_WIDE_IMAGE_WIDTH: u32 = 200;
const MIN_IMAGE_SRC_LEN: usize = 10;

/// Build the image cascade
pub fn cascade() -> Cascade<String> {
    Cascade::new("image")
        .stage("selectors", selector_image)
        .stage("wide-image", wide_image)
        .stage("long-src", long_src_image)
}

fn selector_image(page: &Page) -> Option<String> {
    IMAGE_SELECTORS.iter().find_map(|selector| {
        page.select(selector)
            .iter()
            .find_map(|element| image_url(page, element))
    })
}

fn wide_image(page: &Page) -> Option<String> {
    page.select("img[width]").iter().find_map(|element| {
        let width = element.value().attr("width").and_then(parse_width)?;
        if width > MIN_WIDE_IMAGE_WIDTH {
            image_url(page, element)
        } else {
            None
        }
    })
}

fn long_src_image(page: &Page) -> Option<String> {
    page.select("img[src]").iter().find_map(|element| {
        let src = non_empty_attr(element, "src")?;
        if src.len() > MIN_IMAGE_SRC_LEN {
            page.resolve(src)
        } else {
            None
        }
    })
}

/// First usable URL among the element's image attributes
pub fn image_url(page: &Page, element: &ElementRef) -> Option<String> {
    IMAGE_ATTRIBUTES.iter().find_map(|attr| {
        let value = non_empty_attr(element, attr)?;
        let candidate = if attr.contains("srcset") {
            first_srcset_candidate(value)?
        } else {
            value
        };
        page.resolve(candidate)
    })
}

/// URL of the first candidate in a srcset list, without its descriptor
pub fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()?
        .split_whitespace()
        .next()
}

fn parse_width(raw: &str) -> Option<u32> {
    raw.trim().trim_end_matches("px").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://example.com/p/1").unwrap(), html)
    }

    #[test]
    fn test_relative_path_resolved() {
        let html = r#"<div class="product-image"><img src="/img/x.jpg"></div>"#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "https://example.com/img/x.jpg");
    }

    #[test]
    fn test_attribute_priority_and_srcset() {
        let html = r#"
        <div class="product-gallery">
            <img data-srcset="https://cdn.example.com/a-400.jpg 400w, https://cdn.example.com/a-800.jpg 800w">
        </div>"#;
        assert_eq!(
            cascade().evaluate(&page(html)).unwrap(),
            "https://cdn.example.com/a-400.jpg"
        );

        let lazy = r#"<img class="product-photo-main" src="" data-src="/media/lazy.png">"#;
        assert_eq!(cascade().evaluate(&page(lazy)).unwrap(), "https://example.com/media/lazy.png");
    }

    #[test]
    fn test_selector_order() {
        let html = r#"
        <div class="gallery"><img src="/gallery.jpg"></div>
        <img itemprop="image" src="https://example.com/main.jpg">
        "#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "https://example.com/main.jpg");
    }

    #[test]
    fn test_wide_image_fallback() {
        let html = r#"
        <img src="/icons/cart.svg" width="24">
        <img src="/photos/hero.jpg" width="640px">
        "#;
        assert_eq!(cascade().evaluate(&page(html)).unwrap(), "https://example.com/photos/hero.jpg");
    }

    #[test]
    fn test_long_src_fallback() {
        let html = r#"
        <img src="/p.gif">
        <img src="/uploads/2024/teapot.jpg">
        "#;
        assert_eq!(
            cascade().evaluate(&page(html)).unwrap(),
            "https://example.com/uploads/2024/teapot.jpg"
        );
    }

    #[test]
    fn test_no_images() {
        assert_eq!(cascade().evaluate(&page("<p>text only</p>")), None);
    }

    #[test]
    fn test_first_srcset_candidate() {
        assert_eq!(first_srcset_candidate("a.jpg 1x, b.jpg 2x"), Some("a.jpg"));
        assert_eq!(first_srcset_candidate("  "), None);
    }
}
