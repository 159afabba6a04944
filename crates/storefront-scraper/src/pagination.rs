//! Pagination link discovery on category pages.
//!
//! Storefronts expose further listing pages through a few conventions:
//!
//! ```text
//! <a rel="next" href="?page=2">            rel-next anchors
//! <link rel="next" href="/c/shoes?page=2"> rel-next in <head>
//! <div class="pagination"><a ...>          pagination containers
//! <nav aria-label="Pagination"><a ...>     labelled nav landmarks
//! <a class="page-numbers" ...>             WooCommerce numbered pages
//! <a class="next" ...>                     "next" buttons
//! ```
//!
//! Discovery is deliberately loose. The caller applies the page cap and
//! skips URLs it has already visited.

use std::collections::HashSet;
use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::origin::resolve_href;

static PAGINATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "a[rel='next'], \
         link[rel='next'], \
         .pagination a, \
         nav[aria-label*='pagination'] a, \
         nav[aria-label*='Pagination'] a, \
         a.page-numbers, \
         a.next",
    )
    .expect("valid selector")
});

/// Collects absolute pagination URLs from category-page markup.
///
/// The result holds no duplicates and follows document order, so a caller
/// truncating it to a page cap keeps the links a visitor would see first.
#[must_use]
pub fn find_pagination(markup: &str, base_url: &Url) -> Vec<String> {
    find_pagination_in(&Html::parse_document(markup), base_url)
}

pub(crate) fn find_pagination_in(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    document
        .select(&PAGINATION_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| resolve_href(base_url, href))
        .map(|url| url.to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
