use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff for startup connections.
///
/// The first attempt is immediate; retry `n` waits
/// `initial_delay * multiplier^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self
            .multiplier
            .checked_pow(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    /// 5 retries, 200ms doubling up to 5s
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2,
        }
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// Returns the last error together with the number of attempts made.
///
/// # Example
/// ```ignore
/// use database::common::{RetryPolicy, retry_with_backoff};
///
/// let db = retry_with_backoff(&RetryPolicy::default(), || Database::connect(url.clone())).await;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, (E, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if attempt > policy.max_retries => {
                warn!(attempts = attempt, "Giving up: {}", e);
                return Err((e, attempt));
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed: {}. Retrying",
                    e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
