//! Retry policy for rate-limited upstream calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::UpstreamError;

/// How rate-limited calls are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub delay: Duration,

    /// Multiplier applied to the delay after each retry (1.0 = fixed delay)
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
            backoff_multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the `retry`-th failed attempt (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(retry as i32);
        Duration::try_from_secs_f64(self.delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. Only the last error is reported.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let wait = self.delay_for(attempt - 1);
                    warn!(
                        "Rate limited (attempt {}/{}), waiting {:?} before retry",
                        attempt, attempts, wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    use crate::upstream::Resource;

    fn rate_limited_until(calls: &AtomicU32, succeed_on: u32) -> Result<u32, UpstreamError> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n < succeed_on {
            Err(UpstreamError::RateLimited)
        } else {
            Ok(n)
        }
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_fixed_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_delay() {
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_delay_saturates() {
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(1),
            backoff_multiplier: 1e300,
        };
        assert_eq!(policy.delay_for(4), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_fifth_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = Instant::now();

        let result = RetryPolicy::default()
            .run(move || async move { rate_limited_until(counter, 5) })
            .await;

        assert_eq!(result.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_five_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = Instant::now();

        let result = RetryPolicy::default()
            .run(move || async move { rate_limited_until(counter, u32::MAX) })
            .await;

        assert!(matches!(result, Err(UpstreamError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = Instant::now();

        let result: Result<(), _> = RetryPolicy::default()
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(UpstreamError::NotFound(Resource::Summoner))
            })
            .await;

        assert!(matches!(
            result,
            Err(UpstreamError::NotFound(Resource::Summoner))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_error_reported() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), _> = RetryPolicy::default()
            .run(move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(UpstreamError::RateLimited)
                } else {
                    Err(UpstreamError::Auth)
                }
            })
            .await;

        assert!(matches!(result, Err(UpstreamError::Auth)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy {
            max_attempts: 1,
            ..Default::default()
        };

        let result = policy
            .run(move || async move { rate_limited_until(counter, 2) })
            .await;

        assert!(matches!(result, Err(UpstreamError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
