//! Readiness waits for page operations
//!
//! Replaces fixed sleeps with "check until the condition holds, else give up
//! after a bound". Used for search results, scroll settling, product pages
//! and redirect completion.

use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::trace;

/// Wrap an async page operation with an explicit timeout
///
/// Distinguishes a timeout from the operation's own failure in the error
/// message.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {:.1} seconds",
            timeout.as_secs_f64()
        )),
    }
}

/// Poll `predicate` every `interval` until it returns true or `timeout` elapses.
///
/// The predicate is always evaluated at least once. Returns whether it was
/// satisfied.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    loop {
        if predicate().await {
            trace!("Condition met after {:?}", start.elapsed());
            return true;
        }

        if start.elapsed() >= timeout {
            trace!("Condition not met within {:?}", timeout);
            return false;
        }

        tokio::time::sleep(interval).await;
    }
}
