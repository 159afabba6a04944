//! Retry policy for the HTTP fetch engine.
//!
//! Transient failures (429, network errors, 5xx) are retried with exponential
//! backoff. Everything else is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` if `err` is a transient condition worth retrying.
///
/// Timeouts are not retried: the caller's per-fetch deadline already covers
/// every attempt, so a retry would only eat into the same budget.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } | FetchError::Http(_) => true,
        FetchError::UnexpectedStatus { status, .. } => *status >= 500,
        FetchError::Timeout { .. } | FetchError::Gate { .. } => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for
/// `backoff_base_secs * 2^attempt` seconds and tries again, up to
/// `max_retries` additional attempts after the first try. If all retries are
/// exhausted the last error is returned.
///
/// With `max_retries = 2` the operation is attempted at most 3 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
