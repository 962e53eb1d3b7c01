/*!
 * Bounded retry with a fixed delay between attempts.
 */

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// How often, and how patiently, transient provider failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before each retry; constant, no backoff growth
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// A policy that makes exactly one attempt
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Run `operation`, retrying retryable failures up to `max_retries` times.
    /// Non-retryable failures are returned immediately.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("{} succeeded after {} retries", label, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "{} failed: {} - retrying ({}/{})",
                        label, e, attempt, self.max_retries
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
