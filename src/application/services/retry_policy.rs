use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Bounded exponential backoff with random jitter.
///
/// Retry `n` (1-based) waits `base_delay * 2^(n-1)` shifted by up to `max_jitter`
/// in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(2),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_jitter,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Un-jittered delay before the given retry.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as i64;
        if jitter_ms == 0 {
            return delay;
        }
        let offset = rand::thread_rng().gen_range(-jitter_ms..=jitter_ms);
        let millis = (delay.as_millis() as i64 + offset).max(0);
        Duration::from_millis(millis as u64)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut, P>(&self, mut operation: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    let delay = self.jittered(self.backoff(attempt));
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Attempt failed, not retrying");
                    return Err(e);
                }
            }
        }
    }
}
