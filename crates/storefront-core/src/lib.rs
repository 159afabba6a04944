pub mod config;
pub mod products;

pub use config::{
    load_scrape_config, load_scrape_config_from_env, ScrapeConfig, DEFAULT_CATEGORY_HREF_HINTS,
    DEFAULT_CATEGORY_TEXT_KEYWORDS, MAX_CONCURRENT_REQUESTS,
};
pub use products::{CategoryResult, ProductRecord, SiteResult};

use thiserror::Error;

/// Rejected `STOREFRONT_*` configuration. Every variable is optional, so only
/// malformed or out-of-range values produce an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
