//! Page fetch engine.
//!
//! The pipeline only needs "give me the markup at this URL". [`PageFetcher`]
//! is that seam; [`HttpFetcher`] is the bundled `reqwest` implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use storefront_core::ScrapeConfig;

use crate::error::FetchError;
use crate::origin::extract_domain;
use crate::rate_limit::retry_with_backoff;

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches the final markup of a page.
///
/// Implementations must respect `timeout` themselves; callers in this crate
/// also wrap every call in their own deadline, so an engine that ignores it
/// still cannot hang a scrape.
pub trait PageFetcher {
    /// Returns the page markup, after executing client-side scripts when
    /// `render_js` is set and the engine is able to.
    fn fetch(
        &self,
        url: &str,
        render_js: bool,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// `reqwest`-based fetch engine.
///
/// Returns the server-rendered HTML only. Storefronts that build their
/// listing entirely in the browser yield little or no product markup through
/// this engine; plug a rendering engine in through [`PageFetcher`] for those.
///
/// Transient errors (429, network failures, 5xx) are retried with exponential
/// backoff up to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the given `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a fetcher from the user agent and retry settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, BROWSER_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, url, timeout))?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, url, timeout))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        render_js: bool,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        if render_js {
            tracing::trace!(url, "HttpFetcher does not execute scripts; returning server HTML");
        }
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url, timeout)
        })
        .await
    }
}

fn map_reqwest_error(err: reqwest::Error, url: &str, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        }
    } else {
        FetchError::Http(err)
    }
}
