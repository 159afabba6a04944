//! Tunables for a storefront scrape.
//!
//! Every knob the pipeline reads lives on [`ScrapeConfig`], which is passed
//! into the site scraper at construction. Nothing is read from global state
//! at scrape time, so tests can shrink caps by building the struct directly.

use crate::ConfigError;

/// Anchor-text keywords that mark a navigation link as a category page.
pub const DEFAULT_CATEGORY_TEXT_KEYWORDS: &[&str] = &[
    "shop",
    "store",
    "products",
    "collection",
    "collections",
    "catalog",
    "category",
    "categories",
    "men",
    "women",
    "kids",
    "new",
    "sale",
    "outlet",
];

/// Href substrings that mark a navigation link as a category page.
pub const DEFAULT_CATEGORY_HREF_HINTS: &[&str] = &[
    "/shop",
    "/store",
    "/product-category",
    "/category",
    "/categories",
    "/collections",
    "/catalog",
];

/// Upper bound on `concurrent_requests` accepted from the environment.
pub const MAX_CONCURRENT_REQUESTS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub category_text_keywords: Vec<String>,
    pub category_href_hints: Vec<String>,
    /// Upper bound on category links kept from the homepage.
    pub max_category_links: usize,
    /// Upper bound on pagination pages fetched per category, beyond the first.
    pub max_pages_per_category: usize,
    /// Width of the fetch gate shared by every category and pagination fetch.
    pub concurrent_requests: usize,
    /// Ask the fetch engine to execute client-side scripts before returning markup.
    pub render_js: bool,
    /// Timeout applied to every individual fetch.
    pub fetch_timeout_secs: u64,
    /// Optional deadline for a whole site scrape.
    pub site_timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Retry attempts after the first failure for transient HTTP errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `retry_backoff_base_secs * 2^attempt`.
    pub retry_backoff_base_secs: u64,
    pub log_level: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            category_text_keywords: to_owned_list(DEFAULT_CATEGORY_TEXT_KEYWORDS),
            category_href_hints: to_owned_list(DEFAULT_CATEGORY_HREF_HINTS),
            max_category_links: 25,
            max_pages_per_category: 10,
            concurrent_requests: 5,
            render_js: true,
            fetch_timeout_secs: 40,
            site_timeout_secs: None,
            user_agent: "storefront-scraper/0.1 (catalog-discovery)".to_string(),
            max_retries: 2,
            retry_backoff_base_secs: 1,
            log_level: "info".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Per-fetch timeout as a [`std::time::Duration`].
    #[must_use]
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Load scrape configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_scrape_config() -> Result<ScrapeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_scrape_config_from_env()
}

/// Load scrape configuration from environment variables already in the process.
///
/// Unlike [`load_scrape_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_scrape_config_from_env() -> Result<ScrapeConfig, ConfigError> {
    build_scrape_config(|key| std::env::var(key))
}

/// Build scrape configuration using the provided env-var lookup function.
///
/// Every variable is optional; absent variables keep the
/// [`ScrapeConfig::default`] value.
fn build_scrape_config<F>(lookup: F) -> Result<ScrapeConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ScrapeConfig::default();

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_list = |var: &str, default: Vec<String>| -> Vec<String> {
        match lookup(var) {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => default,
        }
    };

    let category_text_keywords =
        parse_list("STOREFRONT_CATEGORY_KEYWORDS", defaults.category_text_keywords);
    let category_href_hints =
        parse_list("STOREFRONT_CATEGORY_HREF_HINTS", defaults.category_href_hints);
    let max_category_links =
        parse_usize("STOREFRONT_MAX_CATEGORY_LINKS", defaults.max_category_links)?;
    let max_pages_per_category = parse_usize(
        "STOREFRONT_MAX_PAGES_PER_CATEGORY",
        defaults.max_pages_per_category,
    )?;
    let concurrent_requests =
        parse_usize("STOREFRONT_CONCURRENT_REQUESTS", defaults.concurrent_requests)?;
    let render_js = match lookup("STOREFRONT_RENDER_JS") {
        Ok(raw) => parse_bool("STOREFRONT_RENDER_JS", &raw)?,
        Err(_) => defaults.render_js,
    };
    let fetch_timeout_secs =
        parse_u64("STOREFRONT_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?;
    let site_timeout_secs = match lookup("STOREFRONT_SITE_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("STOREFRONT_SITE_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => defaults.site_timeout_secs,
    };
    let user_agent = lookup("STOREFRONT_USER_AGENT").unwrap_or(defaults.user_agent);
    let max_retries = parse_u32("STOREFRONT_MAX_RETRIES", defaults.max_retries)?;
    let retry_backoff_base_secs = parse_u64(
        "STOREFRONT_RETRY_BACKOFF_BASE_SECS",
        defaults.retry_backoff_base_secs,
    )?;
    let log_level = lookup("STOREFRONT_LOG_LEVEL").unwrap_or(defaults.log_level);

    let config = ScrapeConfig {
        category_text_keywords,
        category_href_hints,
        max_category_links,
        max_pages_per_category,
        concurrent_requests,
        render_js,
        fetch_timeout_secs,
        site_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        log_level,
    };
    validate(&config)?;
    Ok(config)
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

fn validate(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.max_category_links == 0 {
        return Err(ConfigError::Validation(
            "max_category_links must be at least 1".to_string(),
        ));
    }
    if config.concurrent_requests == 0 {
        return Err(ConfigError::Validation(
            "concurrent_requests must be at least 1".to_string(),
        ));
    }
    if config.concurrent_requests > MAX_CONCURRENT_REQUESTS {
        return Err(ConfigError::Validation(format!(
            "concurrent_requests must be at most {MAX_CONCURRENT_REQUESTS}"
        )));
    }
    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
