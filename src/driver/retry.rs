//! Bounded retry with exponential backoff at the navigation boundary
//!
//! Only errors that look transient (timeouts, network, rate limiting) are
//! retried. A dead browser or lost session fails fast since every later
//! attempt would fail the same way.

use anyhow::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Classify errors into retryable vs permanent failures
///
/// Unknown errors default to retryable.
pub fn is_retryable_error(error: &anyhow::Error) -> bool {
    let message = format!("{error:#}").to_lowercase();

    // Browser or page state is broken
    if message.contains("browser closed")
        || message.contains("browser disconnected")
        || message.contains("page closed")
        || message.contains("target closed")
        || message.contains("session not found")
        || message.contains("session closed")
        || message.contains("no response from the chromium instance")
        || message.contains("websocket")
    {
        return false;
    }

    true
}

/// Delay before attempt `retries + 1`: base doubled per retry, plus jitter below base
fn backoff_delay(base: Duration, retries: u32) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let exponential = base_ms.saturating_mul(2u64.saturating_pow(retries));
    let jitter = if base_ms > 0 {
        rand::rng().random_range(0..base_ms)
    } else {
        0
    };
    Duration::from_millis(exponential.saturating_add(jitter))
}

/// Retry an operation with exponential backoff and error classification
///
/// Runs `f` once, then up to `max_retries` more times while the error stays
/// retryable. Returns the last error otherwise.
pub async fn retry_with_backoff<F, Fut, T>(
    operation_name: &str,
    max_retries: u32,
    base_delay: Duration,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable_error(&e) {
                    warn!("{operation_name}: non-retryable error, failing fast: {e:#}");
                    return Err(e);
                }

                if retries >= max_retries {
                    if max_retries > 0 {
                        warn!("{operation_name}: max retries ({max_retries}) exceeded: {e:#}");
                    }
                    return Err(e);
                }

                let delay = backoff_delay(base_delay, retries);
                warn!(
                    "{operation_name}: retryable error, attempt {}/{}, retrying in {}ms: {e:#}",
                    retries + 1,
                    max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                retries += 1;
            }
        }
    }
}
