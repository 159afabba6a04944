//! CSS-pattern product extraction for pages without Product JSON-LD.
//!
//! Storefront platforms lay out listing grids in a handful of recognizable
//! ways. Each [`CardPattern`] row names a platform and the selector that
//! finds its product cards; within a card, name, link, and price are found by
//! fixed priority lists.
//!
//! Update the tables below when a platform changes its theme markup.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use storefront_core::ProductRecord;

use crate::classify::visible_text;
use crate::error::BuildError;
use crate::origin::resolve_href;

/// `(platform, card selector)` rows, tried in order.
const CARD_PATTERNS: &[(&str, &str)] = &[
    (
        "generic",
        ".product-card, .product, .grid-product, .card__content, .product-tile, .product-item, .productGrid-item",
    ),
    ("woocommerce", "ul.products li.product"),
    ("shopify", ".product-grid .grid__item, .collection .grid__item"),
    ("magento", ".products-grid .item, .product-item-info"),
];

/// Href substrings that mark an anchor as the product link of a card.
const PRODUCT_LINK_HINTS: &[&str] = &["/product", "/products", "/item", "/shop"];

/// Name elements in priority order.
const NAME_SELECTORS: &[&str] = &[
    "[itemprop='name']",
    ".product-title",
    ".card__heading",
    ".full-unstyled-link",
    ".grid-product__title",
    "h2",
    "h3",
];

/// Price elements in priority order.
const PRICE_SELECTORS: &[&str] = &[
    "[itemprop='price']",
    ".price",
    ".price__regular",
    ".price-item",
    ".product-price",
    ".amount",
    ".price-box",
];

/// Currency symbol or ISO code then amount, or amount then ISO code.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[€$£₹]|\b(?:AED|USD|EUR|GBP|PKR))\s*\d[\d.,]*|\d[\d,.\s]*\s*(?:AED|USD|EUR|GBP|PKR)\b")
        .expect("valid regex")
});
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static DEFAULT_EXTRACTOR: LazyLock<FallbackExtractor> = LazyLock::new(FallbackExtractor::default);

/// One row of the card table: a storefront platform and its card selector.
#[derive(Debug, Clone)]
pub struct CardPattern {
    pub platform: String,
    pub selector: Selector,
}

impl CardPattern {
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSelector`] if `selector` does not parse.
    pub fn new(platform: &str, selector: &str) -> Result<Self, BuildError> {
        Ok(Self {
            platform: platform.to_owned(),
            selector: parse_selector(selector)?,
        })
    }
}

/// Table-driven product-card extractor.
#[derive(Debug, Clone)]
pub struct FallbackExtractor {
    card_patterns: Vec<CardPattern>,
    product_link_hints: Vec<String>,
    name_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        let compile = |sources: &[&str]| -> Vec<Selector> {
            sources
                .iter()
                .map(|s| Selector::parse(s).expect("valid selector"))
                .collect()
        };
        Self {
            card_patterns: CARD_PATTERNS
                .iter()
                .map(|(platform, selector)| CardPattern {
                    platform: (*platform).to_owned(),
                    selector: Selector::parse(selector).expect("valid selector"),
                })
                .collect(),
            product_link_hints: PRODUCT_LINK_HINTS.iter().map(|s| (*s).to_owned()).collect(),
            name_selectors: compile(NAME_SELECTORS),
            price_selectors: compile(PRICE_SELECTORS),
        }
    }
}

impl FallbackExtractor {
    /// Appends a card pattern after the built-in platforms.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSelector`] if `selector` does not parse.
    pub fn with_card_pattern(mut self, platform: &str, selector: &str) -> Result<Self, BuildError> {
        self.card_patterns.push(CardPattern::new(platform, selector)?);
        Ok(self)
    }

    /// Appends a name selector at the lowest priority.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSelector`] if `selector` does not parse.
    pub fn with_name_selector(mut self, selector: &str) -> Result<Self, BuildError> {
        self.name_selectors.push(parse_selector(selector)?);
        Ok(self)
    }

    /// Appends a price selector at the lowest priority.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSelector`] if `selector` does not parse.
    pub fn with_price_selector(mut self, selector: &str) -> Result<Self, BuildError> {
        self.price_selectors.push(parse_selector(selector)?);
        Ok(self)
    }

    #[must_use]
    pub fn card_patterns(&self) -> &[CardPattern] {
        &self.card_patterns
    }

    /// Extracts product cards from raw markup.
    #[must_use]
    pub fn extract(&self, markup: &str, base_url: &Url) -> Vec<ProductRecord> {
        self.extract_document(&Html::parse_document(markup), base_url)
    }

    /// Extracts product cards from an already-parsed document.
    ///
    /// Candidate cards are the union of every pattern's matches (pattern
    /// order, then document order; a card matched by several patterns is
    /// visited once). When two cards resolve to the same URL the first one
    /// wins.
    #[must_use]
    pub fn extract_document(&self, document: &Html, base_url: &Url) -> Vec<ProductRecord> {
        let mut visited_nodes = HashSet::new();
        let mut candidates: Vec<ElementRef<'_>> = Vec::new();
        for pattern in &self.card_patterns {
            let before = candidates.len();
            for node in document.select(&pattern.selector) {
                if visited_nodes.insert(node.id()) {
                    candidates.push(node);
                }
            }
            if candidates.len() > before {
                tracing::trace!(
                    platform = %pattern.platform,
                    matched = candidates.len() - before,
                    "card pattern matched"
                );
            }
        }

        let mut seen_urls = HashSet::new();
        let mut products = Vec::new();

        for card in candidates {
            let Some(product) = self.card_to_product(card, base_url) else {
                continue;
            };
            if seen_urls.insert(product.url.clone()) {
                products.push(product);
            }
        }

        products
    }

    fn card_to_product(&self, card: ElementRef<'_>, base_url: &Url) -> Option<ProductRecord> {
        let link = self.product_link(card);
        let url = link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_href(base_url, href))?;

        let name = first_text(card, &self.name_selectors)
            .or_else(|| link.map(visible_text).filter(|t| !t.is_empty()))?;

        let price = first_element(card, &self.price_selectors).and_then(price_from_element);

        Some(ProductRecord {
            name,
            url: url.to_string(),
            price,
        })
    }

    /// First anchor whose href carries a product-path hint, else the first
    /// anchor with any non-empty href. A card that is itself an anchor is
    /// considered before its descendants.
    fn product_link<'a>(&self, card: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let anchors: Vec<ElementRef<'a>> = std::iter::once(card)
            .filter(|el| el.value().name() == "a")
            .chain(card.select(&ANCHOR_SELECTOR))
            .filter(|a| a.value().attr("href").is_some_and(|h| !h.trim().is_empty()))
            .collect();

        anchors
            .iter()
            .copied()
            .find(|a| {
                let href = a.value().attr("href").unwrap_or_default().to_lowercase();
                self.product_link_hints.iter().any(|hint| href.contains(hint.as_str()))
            })
            .or_else(|| anchors.first().copied())
    }
}

/// Extracts product cards with the built-in pattern tables.
#[must_use]
pub fn extract_fallback(markup: &str, base_url: &Url) -> Vec<ProductRecord> {
    DEFAULT_EXTRACTOR.extract(markup, base_url)
}

/// The built-in extractor, shared so callers don't recompile the tables.
pub(crate) fn default_extractor() -> &'static FallbackExtractor {
    &DEFAULT_EXTRACTOR
}

fn parse_selector(selector: &str) -> Result<Selector, BuildError> {
    Selector::parse(selector).map_err(|e| BuildError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

fn first_element<'a>(card: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|s| card.select(s).next())
}

/// Text of the first element, by selector priority, whose text is non-empty.
fn first_text(card: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|s| {
        card.select(s)
            .map(visible_text)
            .find(|text| !text.is_empty())
    })
}

/// Price string from a price element: the first currency-looking match in
/// its text, else the raw text. An empty element falls back to a `content`
/// attribute (microdata `itemprop="price"` often carries the value there).
fn price_from_element(element: ElementRef<'_>) -> Option<String> {
    let text = visible_text(element);
    if text.is_empty() {
        return element
            .value()
            .attr("content")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
    }
    Some(match_price(&text).unwrap_or(text))
}

fn match_price(text: &str) -> Option<String> {
    PRICE_RE
        .find(text)
        .map(|m| m.as_str().trim().to_owned())
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
