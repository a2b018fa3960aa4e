//! Extraction output record

use serde::{Serialize, Serializer};

/// Name reported when no extraction stage found one
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Product details scraped from a page
///
/// Always produced, even when the page could not be fetched. An absent
/// price or image and the [`UNKNOWN_PRODUCT_NAME`] sentinel are the only
/// signs that a field was not found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductData {
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_price")]
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// Candidate values proposed by a site override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldGuesses {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl Default for ProductData {
    fn default() -> Self {
        Self {
            name: UNKNOWN_PRODUCT_NAME.to_string(),
            description: None,
            price: None,
            image_url: None,
        }
    }
}

impl ProductData {
    pub fn has_name(&self) -> bool {
        self.name != UNKNOWN_PRODUCT_NAME
    }

    /// True when name, price or image is still unresolved
    pub fn has_gaps(&self) -> bool {
        !self.has_name() || self.price.is_none() || self.image_url.is_none()
    }

    /// Copy guesses into fields that are still unresolved. Resolved fields
    /// are never overwritten.
    pub fn fill_gaps(&mut self, guesses: FieldGuesses) {
        if !self.has_name() {
            if let Some(name) = guesses.name.filter(|n| !n.trim().is_empty()) {
                self.name = name;
            }
        }
        if self.price.is_none() {
            self.price = guesses.price;
        }
        if self.image_url.is_none() {
            self.image_url = guesses.image_url;
        }
        if self.description.is_none() {
            self.description = guesses.description;
        }
    }
}

/// Round a price to cents
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

fn serialize_price<S: Serializer>(price: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(p) => serializer.serialize_some(&round_price(*p)),
        None => serializer.serialize_none(),
    }
}
