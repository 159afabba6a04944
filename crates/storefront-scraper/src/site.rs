//! Whole-site scraping: homepage, category discovery, gated fan-out.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Url;
use storefront_core::{ScrapeConfig, SiteResult};
use tokio::sync::Semaphore;

use crate::classify::{extract_category_links, LinkClassifier};
use crate::error::{FetchError, ScrapeError};
use crate::fallback::{default_extractor, FallbackExtractor};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::origin::normalize_homepage_url;

/// Scrapes a storefront: discovers category links on the homepage and
/// extracts the product listings of every category.
///
/// All category and pagination fetches of one [`SiteScraper::scrape_site`]
/// call share a single gate of `concurrent_requests` slots. Category scrapes
/// run interleaved on the calling task; nothing is spawned.
pub struct SiteScraper<F> {
    fetcher: F,
    config: ScrapeConfig,
    classifier: LinkClassifier,
    fallback: Option<FallbackExtractor>,
}

impl SiteScraper<HttpFetcher> {
    /// Builds a scraper backed by [`HttpFetcher`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: ScrapeConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<F: PageFetcher> SiteScraper<F> {
    #[must_use]
    pub fn new(fetcher: F, config: ScrapeConfig) -> Self {
        let classifier = LinkClassifier::from_config(&config);
        Self {
            fetcher,
            config,
            classifier,
            fallback: None,
        }
    }

    /// Replaces the category-link rule table.
    #[must_use]
    pub fn with_classifier(mut self, classifier: LinkClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the product-card pattern tables.
    #[must_use]
    pub fn with_fallback_extractor(mut self, extractor: FallbackExtractor) -> Self {
        self.fallback = Some(extractor);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub(crate) fn fallback_extractor(&self) -> &FallbackExtractor {
        self.fallback.as_ref().unwrap_or(default_extractor())
    }

    /// Scrapes every category linked from `homepage_url`.
    ///
    /// A homepage without a scheme gets `https://`. The result is returned
    /// whenever the homepage loads; category failures show up as per-category
    /// `error` entries.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::InvalidUrl`]: the normalized homepage does not parse.
    /// - [`ScrapeError::HomepageFetch`]: the homepage could not be fetched.
    /// - [`ScrapeError::SiteTimeout`]: `site_timeout_secs` is set and elapsed;
    ///   outstanding fetches are cancelled and no partial result is returned.
    pub async fn scrape_site(&self, homepage_url: &str) -> Result<SiteResult, ScrapeError> {
        let homepage = normalize_homepage_url(homepage_url);
        match self.config.site_timeout_secs {
            Some(timeout_secs) => tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                self.scrape_normalized(&homepage),
            )
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(homepage = %homepage, timeout_secs, "site scrape timed out");
                Err(ScrapeError::SiteTimeout {
                    url: homepage.clone(),
                    timeout_secs,
                })
            }),
            None => self.scrape_normalized(&homepage).await,
        }
    }

    async fn scrape_normalized(&self, homepage: &str) -> Result<SiteResult, ScrapeError> {
        let homepage_url = Url::parse(homepage).map_err(|e| ScrapeError::InvalidUrl {
            url: homepage.to_owned(),
            reason: e.to_string(),
        })?;

        let markup =
            self.fetch_page(homepage)
                .await
                .map_err(|source| ScrapeError::HomepageFetch {
                    url: homepage.to_owned(),
                    source,
                })?;

        let categories_found = extract_category_links(
            &markup,
            &homepage_url,
            &self.classifier,
            self.config.max_category_links,
        );
        tracing::info!(
            homepage,
            categories = categories_found.len(),
            "discovered category links"
        );

        let data = {
            let gate = self.fetch_gate();
            let mut pending: FuturesUnordered<_> = categories_found
                .iter()
                .map(|url| self.scrape_category(url, &gate))
                .collect();

            let mut data = BTreeMap::new();
            while let Some(result) = pending.next().await {
                data.insert(result.category_url.clone(), result);
            }
            data
        };

        let result = SiteResult {
            homepage: homepage.to_owned(),
            categories_found,
            data,
        };
        tracing::info!(
            homepage,
            products = result.product_count(),
            failed_categories = result.failed_category_count(),
            "site scrape complete"
        );
        Ok(result)
    }

    /// A fresh fetch gate of `concurrent_requests` slots, clamped to what
    /// [`Semaphore`] can hold.
    #[must_use]
    pub fn fetch_gate(&self) -> Semaphore {
        Semaphore::new(
            self.config
                .concurrent_requests
                .clamp(1, Semaphore::MAX_PERMITS),
        )
    }

    /// Fetches `url` after acquiring a slot on `gate`. The slot is held for
    /// the duration of the fetch only.
    pub(crate) async fn gated_fetch(&self, url: &str, gate: &Semaphore) -> Result<String, FetchError> {
        let _permit = gate.acquire().await.map_err(|_| FetchError::Gate {
            url: url.to_owned(),
        })?;
        self.fetch_page(url).await
    }

    /// Fetches `url` under the configured per-fetch deadline.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(
            timeout,
            self.fetcher.fetch(url, self.config.render_js, timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.fetch_timeout_secs,
            }),
        }
    }
}
