use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A product listing extracted from a storefront category page.
///
/// Identity is the absolute `url`; two records with the same URL describe the
/// same product even when their names or prices differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Display name, trimmed and never empty.
    pub name: String,
    /// Absolute product URL, resolved against the page it was found on.
    pub url: String,
    /// Price exactly as the page shows it (e.g. `"19.99"`, `"$1,299.00"`,
    /// `"49,90 EUR"`). Not parsed into a numeric currency value. Serialized
    /// as `null` when the page carries no price.
    pub price: Option<String>,
}

/// Outcome of scraping one category page and its pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// The category page this result belongs to. Not part of the serialized
    /// shape: inside a [`SiteResult`] the URL is already the map key.
    #[serde(skip)]
    pub category_url: String,
    /// Set only when the first category-page fetch failed, in the form
    /// `"fetch_failed: <detail>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Products deduplicated by URL. Empty whenever `error` is set.
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl CategoryResult {
    /// Builds a result for a category whose first page could not be fetched.
    #[must_use]
    pub fn fetch_failed(category_url: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self {
            category_url: category_url.into(),
            error: Some(format!("fetch_failed: {detail}")),
            products: Vec::new(),
        }
    }

    /// Returns `true` if the category page itself could not be fetched.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Top-level output of one site scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResult {
    /// The homepage URL after scheme normalization (e.g. `"https://example.com"`).
    pub homepage: String,
    /// Category URLs in homepage document order, capped.
    pub categories_found: Vec<String>,
    /// One entry per category URL in `categories_found`.
    pub data: BTreeMap<String, CategoryResult>,
}

impl SiteResult {
    /// Total number of products across all categories. A product listed in
    /// two categories is counted twice.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.data.values().map(|c| c.products.len()).sum()
    }

    /// Number of categories whose first page could not be fetched.
    #[must_use]
    pub fn failed_category_count(&self) -> usize {
        self.data.values().filter(|c| c.is_error()).count()
    }
}
