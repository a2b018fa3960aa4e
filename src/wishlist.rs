//! Wishlist-side types the extractor's callers work with
//!
//! Persistence, authentication and routing live in the hosting service.
//! This module holds the small pieces of its domain logic that decide what
//! happens to an extraction result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::product::{round_price, ProductData};

pub type UserId = u64;

/// Maximum length of a stored item name
pub const ITEM_NAME_MAX_LEN: usize = 255;

/// Largest price a stored item holds (ten digits, two of them decimals)
pub const ITEM_PRICE_MAX: f64 = 99_999_999.99;

/// Who may see a wishlist.
///
/// There is no separate "public" level: a shared wishlist is readable by
/// anyone holding its slug link and is never listed to other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Shared,
}

impl Visibility {
    pub fn can_view(self, owner: UserId, viewer: Option<UserId>, via_slug_link: bool) -> bool {
        if viewer == Some(owner) {
            return true;
        }
        match self {
            Visibility::Private => false,
            Visibility::Shared => via_slug_link,
        }
    }

    /// Only the owner may change a wishlist or add items to it
    pub fn can_edit(self, owner: UserId, viewer: Option<UserId>) -> bool {
        viewer == Some(owner)
    }
}

/// Purchase state of a wishlist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Purchase {
    #[default]
    Available,
    Purchased { by: UserId, at: DateTime<Utc> },
}

impl Purchase {
    pub fn purchased_now(by: UserId) -> Self {
        Purchase::Purchased { by, at: Utc::now() }
    }

    pub fn purchaser(&self) -> Option<UserId> {
        match self {
            Purchase::Available => None,
            Purchase::Purchased { by, .. } => Some(*by),
        }
    }

    /// Any signed-in user who can see the wishlist may mark its items
    /// purchased, the owner included
    pub fn can_mark_purchased(
        visibility: Visibility,
        owner: UserId,
        viewer: Option<UserId>,
        via_slug_link: bool,
    ) -> bool {
        viewer.is_some() && visibility.can_view(owner, viewer, via_slug_link)
    }

    /// Only the purchaser or the wishlist owner may clear a purchase
    pub fn can_unmark(&self, owner: UserId, viewer: Option<UserId>) -> bool {
        viewer.is_some() && (viewer == Some(owner) || viewer == self.purchaser())
    }
}

/// Lowercase, hyphen-separated ASCII slug of `title`.
///
/// Accented letters are decomposed and keep their base letter ("Café" gives
/// "cafe"); other non-ASCII characters are dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().nfkd().filter(char::is_ascii).map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if (c.is_ascii_whitespace() || c == '-') && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_matches(['-', '_']).to_string()
}

/// Slug of `title` that `is_taken` does not report as used:
/// `base`, then `base-1`, `base-2`, ...
pub fn unique_slug(title: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = slugify(title);
    if !is_taken(&base) {
        return base;
    }
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !is_taken(candidate.as_str()))
        .unwrap_or(base)
}

/// Body of an add-from-URL request
#[derive(Debug, Clone, Deserialize)]
pub struct AddFromUrl {
    pub url: String,
    #[serde(default)]
    pub wishlist_id: Option<u64>,
    #[serde(default)]
    pub extract_only: bool,
}

/// What the service should do with an extraction result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Return the scraped fields to the client without storing anything
    Preview,
    /// Store the result as a new item of the wishlist
    Persist { wishlist_id: u64 },
}

impl AddFromUrl {
    /// `None` when the request asks to persist but names no wishlist
    pub fn mode(&self) -> Option<ExtractMode> {
        if self.extract_only {
            return Some(ExtractMode::Preview);
        }
        self.wishlist_id
            .map(|wishlist_id| ExtractMode::Persist { wishlist_id })
    }
}

/// A new wishlist item built from extracted product data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub url: String,
    pub image_url: String,
    pub purchase: Purchase,
}

impl ItemDraft {
    /// Prices outside `0..=ITEM_PRICE_MAX` are dropped
    pub fn from_product(url: &str, product: &ProductData) -> Self {
        Self {
            name: product.name.chars().take(ITEM_NAME_MAX_LEN).collect(),
            description: product.description.clone().unwrap_or_default(),
            price: product
                .price
                .map(round_price)
                .filter(|price| (0.0..=ITEM_PRICE_MAX).contains(price)),
            url: url.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            purchase: Purchase::Available,
        }
    }
}
