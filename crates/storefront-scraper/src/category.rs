//! Per-category scraping: first page, bounded pagination, merge.

use std::collections::{HashMap, HashSet};

use reqwest::Url;
use scraper::Html;
use storefront_core::{CategoryResult, ProductRecord};
use tokio::sync::Semaphore;

use crate::fetch::PageFetcher;
use crate::jsonld::extract_structured;
use crate::pagination::find_pagination_in;
use crate::site::SiteScraper;

impl<F: PageFetcher> SiteScraper<F> {
    /// Scrapes one category page and up to `max_pages_per_category` of its
    /// pagination pages.
    ///
    /// Every fetch acquires a slot on `gate`. Pagination pages are fetched
    /// one after another. A failed first fetch yields a result with `error`
    /// set; a failed pagination fetch only skips that page. Products from all
    /// pages are merged by URL, a later page replacing an earlier record.
    pub async fn scrape_category(&self, category_url: &str, gate: &Semaphore) -> CategoryResult {
        let base_url = match Url::parse(category_url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(category_url, error = %err, "category URL does not parse");
                return CategoryResult::fetch_failed(category_url, format!("invalid URL: {err}"));
            }
        };

        let markup = match self.gated_fetch(category_url, gate).await {
            Ok(markup) => markup,
            Err(err) => {
                tracing::warn!(category_url, error = %err, "category page fetch failed");
                return CategoryResult::fetch_failed(category_url, err);
            }
        };

        let (mut products, pagination) = self.first_page(&markup, &base_url);

        let mut visited: HashSet<String> =
            HashSet::from([category_url.to_owned(), base_url.to_string()]);
        let mut pages_fetched = 0usize;
        let mut pages_failed = 0usize;

        for page_url in pagination
            .into_iter()
            .take(self.config().max_pages_per_category)
        {
            if !visited.insert(page_url.clone()) {
                continue;
            }
            let page_markup = match self.gated_fetch(&page_url, gate).await {
                Ok(markup) => markup,
                Err(err) => {
                    pages_failed += 1;
                    tracing::warn!(
                        category_url,
                        page_url = %page_url,
                        error = %err,
                        "pagination page fetch failed; skipping page"
                    );
                    continue;
                }
            };
            pages_fetched += 1;
            let Ok(page_base) = Url::parse(&page_url) else {
                continue;
            };
            products.extend(self.extract_page(&page_markup, &page_base));
        }

        let products = merge_by_url(products);
        tracing::debug!(
            category_url,
            products = products.len(),
            pages_fetched,
            pages_failed,
            "category scraped"
        );

        CategoryResult {
            category_url: category_url.to_owned(),
            error: None,
            products,
        }
    }

    /// Products and pagination links from the first category page. The
    /// document is parsed once and never held across an await.
    fn first_page(&self, markup: &str, base_url: &Url) -> (Vec<ProductRecord>, Vec<String>) {
        let document = Html::parse_document(markup);
        let products = self.page_products(markup, &document, base_url);
        let pagination = find_pagination_in(&document, base_url);
        (products, pagination)
    }

    fn extract_page(&self, markup: &str, base_url: &Url) -> Vec<ProductRecord> {
        let document = Html::parse_document(markup);
        self.page_products(markup, &document, base_url)
    }

    /// Structured data first; the CSS fallback runs only when it is empty.
    fn page_products(&self, markup: &str, document: &Html, base_url: &Url) -> Vec<ProductRecord> {
        let structured = extract_structured(markup, base_url);
        if !structured.is_empty() {
            tracing::debug!(page = %base_url, count = structured.len(), "extracted products from JSON-LD");
            return structured;
        }
        let fallback = self.fallback_extractor().extract_document(document, base_url);
        tracing::debug!(page = %base_url, count = fallback.len(), "extracted products from card patterns");
        fallback
    }
}

/// Deduplicates by URL. The last record for a URL wins; it takes the
/// position where that URL first appeared.
fn merge_by_url(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<ProductRecord> = Vec::with_capacity(records.len());

    for record in records {
        if let Some(&idx) = positions.get(&record.url) {
            merged[idx] = record;
        } else {
            positions.insert(record.url.clone(), merged.len());
            merged.push(record);
        }
    }

    merged
}
