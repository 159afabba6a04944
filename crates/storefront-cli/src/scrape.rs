//! Command handlers for `scrape` and `category`.
//!
//! Results are printed to stdout as JSON. A category failure is part of the
//! result, not an error; only an unreachable homepage ends the run with a
//! non-zero exit.

use serde::Serialize;
use storefront_core::{CategoryResult, ScrapeConfig};
use storefront_scraper::SiteScraper;

/// Scrape every category of the storefront at `homepage`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the homepage URL is
/// invalid or unreachable, or the site timeout elapses.
pub(crate) async fn run_scrape_site(
    config: ScrapeConfig,
    homepage: &str,
    pretty: bool,
) -> anyhow::Result<()> {
    let scraper = SiteScraper::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?;

    let result = scraper.scrape_site(homepage).await?;
    tracing::info!(
        homepage = %result.homepage,
        categories = result.categories_found.len(),
        products = result.product_count(),
        failed = result.failed_category_count(),
        "scrape finished"
    );

    println!("{}", render_json(&result, pretty)?);
    Ok(())
}

/// Output shape of the `category` command: the category result with its URL.
#[derive(Debug, Serialize)]
struct CategoryOutput<'a> {
    category_url: &'a str,
    #[serde(flatten)]
    result: &'a CategoryResult,
}

/// Scrape one category page and its pagination.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built. Fetch failures
/// are reported in the printed `error` field.
pub(crate) async fn run_scrape_category(
    config: ScrapeConfig,
    category_url: &str,
    pretty: bool,
) -> anyhow::Result<()> {
    let scraper = SiteScraper::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?;
    let gate = scraper.fetch_gate();

    let result = scraper.scrape_category(category_url, &gate).await;
    if let Some(error) = &result.error {
        tracing::warn!(category_url, error = %error, "category scrape failed");
    }

    let output = CategoryOutput {
        category_url,
        result: &result,
    };
    println!("{}", render_json(&output, pretty)?);
    Ok(())
}

fn render_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
