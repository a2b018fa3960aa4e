//! Parsed product page and CSS selector helpers

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched document together with the URL it was requested from
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Elements matching a CSS selector anywhere in the document.
    /// An invalid selector matches nothing.
    pub fn select(&self, selector_str: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector_str) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(_) => vec![],
        }
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, selector_str: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector_str).ok()?;
        self.document.select(&selector).next()
    }

    /// Resolve an attribute value found in the page against the request URL.
    /// Only http(s) results and inline `data:` URIs are returned.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:")) {
            return Some(raw.to_string());
        }
        self.url
            .join(raw)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .map(String::from)
    }
}

/// Elements matching a CSS selector inside `scope`
pub fn select_within<'a>(scope: ElementRef<'a>, selector_str: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector_str) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => vec![],
    }
}

/// Text content of an element with whitespace runs collapsed
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Non-empty, trimmed attribute value
pub fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://example.com/p/1").unwrap(), html)
    }

    #[test]
    fn test_resolve_relative_paths() {
        let page = page("<html></html>");
        assert_eq!(page.resolve("/img/x.jpg").unwrap(), "https://example.com/img/x.jpg");
        assert_eq!(page.resolve("//cdn.example.net/x.jpg").unwrap(), "https://cdn.example.net/x.jpg");
        assert_eq!(page.resolve("x.jpg").unwrap(), "https://example.com/p/x.jpg");
        assert_eq!(
            page.resolve("https://images.example.org/a.png").unwrap(),
            "https://images.example.org/a.png"
        );
        assert!(page.resolve("   ").is_none());
    }

    #[test]
    fn test_resolve_rejects_other_schemes() {
        let page = page("<html></html>");
        assert!(page.resolve("javascript:void(0)").is_none());
        assert!(page.resolve("about:blank").is_none());
        assert!(page.resolve("ftp://files.example.com/a.jpg").is_none());
        assert_eq!(
            page.resolve("data:image/gif;base64,R0lGOD").unwrap(),
            "data:image/gif;base64,R0lGOD"
        );
    }

    #[test]
    fn test_select_and_text() {
        let page = page(
            r#"<div class="product"><span class="name">
                Wool   Scarf
            </span></div>"#,
        );
        let name = page.select_first("div.product .name").unwrap();
        assert_eq!(element_text(&name), "Wool Scarf");

        let container = page.select_first(".product").unwrap();
        assert_eq!(select_within(container, ".name").len(), 1);

        assert!(page.select("div[[").is_empty());
        assert!(page.select_first("div[[").is_none());
    }
}
