//! Category-link classification for storefront navigation.
//!
//! A link is a category candidate when its anchor text carries a shopping
//! keyword, its href contains a catalog path hint, or its href has a
//! taxonomy-style path segment (`/men/`, `/sale`). Rules live in an ordered
//! table so new storefront conventions are added as rows, not branches.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use storefront_core::{ScrapeConfig, DEFAULT_CATEGORY_HREF_HINTS, DEFAULT_CATEGORY_TEXT_KEYWORDS};

use crate::error::BuildError;
use crate::origin::{is_same_origin, resolve_href};

const TAXONOMY_SEGMENT_PATTERN: &str = r"/(men|women|kids|new|sale)(/|$)";

static TAXONOMY_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TAXONOMY_SEGMENT_PATTERN).expect("valid regex"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static DEFAULT_CLASSIFIER: LazyLock<LinkClassifier> = LazyLock::new(LinkClassifier::default);

/// One row of the classification table. All matching is done on trimmed,
/// lowercased input, so keywords and hints should be lowercase.
#[derive(Debug, Clone)]
pub enum CategoryRule {
    /// Anchor text contains the keyword.
    TextKeyword(String),
    /// Href contains the substring.
    HrefHint(String),
    /// Href matches the pattern.
    HrefPattern(Regex),
}

impl CategoryRule {
    fn matches(&self, text: &str, href: &str) -> bool {
        match self {
            CategoryRule::TextKeyword(keyword) => text.contains(keyword.as_str()),
            CategoryRule::HrefHint(hint) => href.contains(hint.as_str()),
            CategoryRule::HrefPattern(re) => re.is_match(href),
        }
    }
}

/// Ordered category-link rule table. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    rules: Vec<CategoryRule>,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::from_lists(DEFAULT_CATEGORY_TEXT_KEYWORDS, DEFAULT_CATEGORY_HREF_HINTS)
    }
}

impl LinkClassifier {
    /// Creates a classifier from an explicit rule table.
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Builds the standard table (text keywords, then href hints, then the
    /// taxonomy-segment pattern) from the keyword lists in `config`.
    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::from_lists(
            config.category_text_keywords.as_slice(),
            config.category_href_hints.as_slice(),
        )
    }

    fn from_lists<K: AsRef<str>, H: AsRef<str>>(keywords: &[K], hints: &[H]) -> Self {
        let mut rules: Vec<CategoryRule> = keywords
            .iter()
            .map(|k| CategoryRule::TextKeyword(k.as_ref().to_lowercase()))
            .collect();
        rules.extend(
            hints
                .iter()
                .map(|h| CategoryRule::HrefHint(h.as_ref().to_lowercase())),
        );
        rules.push(CategoryRule::HrefPattern(TAXONOMY_SEGMENT_RE.clone()));
        Self { rules }
    }

    /// Appends a rule to the end of the table.
    #[must_use]
    pub fn with_rule(mut self, rule: CategoryRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends an href pattern rule compiled from `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn with_href_pattern(self, pattern: &str) -> Result<Self, BuildError> {
        let re = Regex::new(pattern).map_err(|source| BuildError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(self.with_rule(CategoryRule::HrefPattern(re)))
    }

    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns the first rule that classifies the anchor as a category link.
    #[must_use]
    pub fn matching_rule(&self, anchor_text: &str, href: &str) -> Option<&CategoryRule> {
        let text = anchor_text.trim().to_lowercase();
        let href = href.trim().to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&text, &href))
    }

    #[must_use]
    pub fn is_category_link(&self, anchor_text: &str, href: &str) -> bool {
        self.matching_rule(anchor_text, href).is_some()
    }
}

/// Classifies an anchor with the default rule table.
///
/// ```
/// use storefront_scraper::is_category_link;
///
/// assert!(is_category_link("Shop Men", "/men"));
/// assert!(is_category_link("Tops", "/collections/tops"));
/// assert!(!is_category_link("About", "/about"));
/// ```
#[must_use]
pub fn is_category_link(anchor_text: &str, href: &str) -> bool {
    DEFAULT_CLASSIFIER.is_category_link(anchor_text, href)
}

/// Collects same-origin category links from homepage markup.
///
/// Anchors are classified on their raw `href` and visible text, resolved
/// against `homepage`, filtered to the homepage's scheme and host, and
/// deduplicated keeping the first document position. At most `cap` URLs are
/// returned, in document order.
#[must_use]
pub fn extract_category_links(
    markup: &str,
    homepage: &Url,
    classifier: &LinkClassifier,
    cap: usize,
) -> Vec<String> {
    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        if links.len() >= cap {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_href(homepage, href) else {
            continue;
        };
        if !is_same_origin(homepage, &resolved) {
            continue;
        }
        let text = visible_text(anchor);
        let Some(rule) = classifier.matching_rule(&text, href) else {
            continue;
        };
        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            tracing::trace!(url = %url, text = %text, ?rule, "classified category link");
            links.push(url);
        }
    }

    links
}

/// Text content with each text node trimmed and joined by single spaces.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
