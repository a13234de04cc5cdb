use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const MAX_ATTEMPTS: u32 = 5;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Fixed attempt budget with a constant pause between attempts.
/// The delay never grows; there is no overall deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Longest time `with_retry` can spend sleeping before giving up.
    pub fn worst_case_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

/// Every attempt failed; `source` is the error from the final attempt.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempt(s): {source}")]
pub struct RetryExhausted<E>
where
    E: std::error::Error + 'static,
{
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// Runs `op` until it succeeds or the policy's attempts are used up.
///
/// Success at any attempt is returned immediately. A zero `max_attempts` is
/// treated as one attempt so the caller always gets a real error back.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(source) if attempt >= max_attempts => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    source,
                });
            }
            Err(e) => {
                warn!("Database connection failed (attempt {attempt}/{max_attempts}): {e}");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    use crate::store::StoreError;

    fn failing_until(
        calls: Arc<AtomicU32>,
        succeed_on: Option<u32>,
    ) -> impl FnMut() -> std::future::Ready<Result<u32, StoreError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(match succeed_on {
                Some(target) if n >= target => Ok(n),
                _ => Err(StoreError::Unavailable(format!("refused #{n}"))),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let out = with_retry(&RetryPolicy::default(), failing_until(calls.clone(), Some(1)))
            .await
            .unwrap();
        assert_eq!(out, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let out = with_retry(&RetryPolicy::default(), failing_until(calls.clone(), Some(3)))
            .await
            .unwrap();
        assert_eq!(out, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two constant pauses, no backoff growth.
        assert_eq!(start.elapsed(), RETRY_DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let err = with_retry(&RetryPolicy::default(), failing_until(calls.clone(), None))
            .await
            .unwrap_err();
        assert_eq!(err.attempts, MAX_ATTEMPTS);
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
        assert!(err.source.to_string().contains("refused #5"));
        assert_eq!(start.elapsed(), RetryPolicy::default().worst_case_wait());
        assert_eq!(start.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_secs(2),
        };
        let err = with_retry(&policy, failing_until(calls.clone(), None))
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
