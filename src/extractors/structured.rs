//! JSON-LD and meta tag lookups
//!
//! Product objects come from <script type="application/ld+json"> blocks.
//! A block may hold one object, an array of objects, or an `@graph`.

use serde_json::Value;

use super::page::Page;
use super::price::parse_price_text;

const PRODUCT_TYPE: &str = "Product";

/// schema.org Product objects embedded in the page, in document order
pub fn products(page: &Page) -> Vec<Value> {
    let mut found = Vec::new();
    for element in page.select(r#"script[type="application/ld+json"]"#) {
        let text = element.text().collect::<String>();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => collect_products(json, &mut found),
            Err(e) => log::trace!("skipping malformed JSON-LD block: {}", e),
        }
    }
    found
}

/// Move every Product object in `value` into `found`. Products nested as
/// properties of other objects (e.g. `itemListElement`) are not searched.
fn collect_products(value: Value, found: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_products(item, found);
            }
        }
        Value::Object(mut obj) => {
            let graph = obj.remove("@graph");
            if is_product(obj.get("@type")) {
                found.push(Value::Object(obj));
            }
            if let Some(graph @ Value::Array(_)) = graph {
                collect_products(graph, found);
            }
        }
        _ => {}
    }
}

/// `@type` names Product, bare or as a schema.org IRI, alone or in a list
fn is_product(type_val: Option<&Value>) -> bool {
    let is_product_name = |name: &str| {
        name.strip_prefix("https://schema.org/")
            .or_else(|| name.strip_prefix("http://schema.org/"))
            .unwrap_or(name)
            == PRODUCT_TYPE
    };
    match type_val {
        Some(Value::String(name)) => is_product_name(name.as_str()),
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).any(is_product_name),
        _ => false,
    }
}

/// Price of the first offer that carries one. `offers` may be a single
/// object or an array of objects.
pub fn offer_price(product: &Value) -> Option<f64> {
    match product.get("offers")? {
        Value::Array(offers) => offers.iter().find_map(single_offer_price),
        offer @ Value::Object(_) => single_offer_price(offer),
        _ => None,
    }
}

fn single_offer_price(offer: &Value) -> Option<f64> {
    offer
        .get("price")
        .or_else(|| offer.get("lowPrice"))
        .and_then(json_price)
}

/// Numeric price from a JSON number or a price string
pub fn json_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_price_text(s),
        _ => None,
    }
}

/// Non-empty string property of the first Product that has it
pub fn product_text(page: &Page, key: &str) -> Option<String> {
    products(page).iter().find_map(|product| {
        product
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// `content` of the first `<meta>` whose `property` or `name` equals one of `keys`
pub fn meta_content(page: &Page, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let selector = format!(r#"meta[property="{key}"], meta[name="{key}"]"#);
        page.select(&selector).into_iter().find_map(|el| {
            el.value()
                .attr("content")
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://shop.example.com/item").unwrap(), html)
    }

    #[test]
    fn test_graph_and_array_forms() {
        let html = r#"
        <script type="application/ld+json">
        [{"@type": "BreadcrumbList"}, {"@type": "Product", "name": "Lamp", "offers": [{"price": "24.50"}]}]
        </script>
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@graph": [
            {"@type": "Organization", "name": "Org"},
            {"@type": ["Product", "IndividualProduct"], "name": "Shade"}
        ]}
        </script>
        "#;
        let products = products(&page(html));
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["name"], "Lamp");
        assert_eq!(offer_price(&products[0]), Some(24.5));
        assert_eq!(products[1]["name"], "Shade");
    }

    #[test]
    fn test_is_product() {
        assert!(is_product(Some(&serde_json::json!("Product"))));
        assert!(is_product(Some(&serde_json::json!("https://schema.org/Product"))));
        assert!(is_product(Some(&serde_json::json!(["Thing", "Product"]))));
        assert!(!is_product(Some(&serde_json::json!("ProductGroup"))));
        assert!(!is_product(None));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
        <script type="application/ld+json">{"@type": "Product", "name": </script>
        <script type="application/ld+json">{"@type": "http://schema.org/Product", "name": "Kettle"}</script>
        "#;
        assert_eq!(product_text(&page(html), "name").as_deref(), Some("Kettle"));
    }

    #[test]
    fn test_offer_price_number_and_aggregate() {
        let single: Value = serde_json::json!({"offers": {"price": 19.99}});
        assert_eq!(offer_price(&single), Some(19.99));

        let aggregate: Value = serde_json::json!({"offers": {"@type": "AggregateOffer", "lowPrice": "15"}});
        assert_eq!(offer_price(&aggregate), Some(15.0));

        let none: Value = serde_json::json!({"offers": {"priceCurrency": "USD"}});
        assert_eq!(offer_price(&none), None);
    }

    #[test]
    fn test_meta_content() {
        let page = page(
            r#"<meta property="product:price:amount" content=" 39.00 ">
               <meta name="description" content="Soft cotton tee">"#,
        );
        assert_eq!(meta_content(&page, &["og:price:amount", "product:price:amount"]).as_deref(), Some("39.00"));
        assert_eq!(meta_content(&page, &["description"]).as_deref(), Some("Soft cotton tee"));
        assert_eq!(meta_content(&page, &["og:title"]), None);
    }
}
