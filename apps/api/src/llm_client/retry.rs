// Retry wrapper for provider calls with linear backoff.
//
// Provider failures are classified by their message text: the provider
// reports overload and throttling only in free-text error bodies. The
// classification lives in `is_retryable_message` and is referenced through
// `RetryPolicy::classify`, so call sites never see the matching rules.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use regex_lite::Regex;
use tracing::warn;

/// Total attempts, including the first one.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay; the wait before attempt `n + 1` is `BACKOFF_BASE * n`.
const BACKOFF_BASE: Duration = Duration::from_millis(800);

static RETRYABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(overloaded|retry|503|UNAVAILABLE|rate limit)")
        .expect("retryable pattern is a valid regex")
});

/// Returns true when an error message describes a transient provider failure.
pub fn is_retryable_message(message: &str) -> bool {
    RETRYABLE_PATTERN.is_match(message)
}

#[derive(Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub classify: fn(&str) -> bool,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BACKOFF_BASE,
            classify: is_retryable_message,
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the `failed_attempt`-th failure (1-based).
    /// Grows linearly: 800ms, 1600ms, ...
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        self.base_delay.saturating_mul(failed_attempt)
    }
}

/// Runs `operation` until it succeeds, fails fatally, or the attempt budget
/// is spent. The last error is returned unchanged.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let message = err.to_string();
                if attempt >= policy.max_attempts || !(policy.classify)(&message) {
                    return Err(err);
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %message,
                    "LLM call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
