use thiserror::Error;

/// Failure of a single page fetch.
///
/// Where the fetch happened decides how bad this is: fatal for a homepage,
/// recorded per-category for a category page, skipped for a pagination page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("fetch gate closed before {url} could be fetched")]
    Gate { url: String },
}

/// Errors that abort a whole site scrape. Category and pagination failures
/// never surface here; they are folded into the [`crate::SiteResult`].
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch homepage {url}: {source}")]
    HomepageFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("site scrape of {url} exceeded {timeout_secs}s")]
    SiteTimeout { url: String, timeout_secs: u64 },
}

/// Rejected rule-table row, returned while building a [`crate::LinkClassifier`]
/// or [`crate::FallbackExtractor`]. Never produced during a scrape.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
