//! Retry with exponential backoff for transient stage failures

use std::future::Future;
use std::time::Duration;

use crate::agents::StageError;

/// Backoff schedule for one stage. Non-retryable errors (parse failures,
/// invalid provider responses) fail immediately regardless of the budget.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given 1-based attempt: doubles each
    /// attempt, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Run `op` until it succeeds, fails non-retryably, or exhausts the attempt
/// budget. Returns the final result and the number of attempts made.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> (Result<T, StageError>, u32)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StageError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return (Ok(value), attempt),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return (Err(e), attempt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::GatewayError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn tiny_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(4), Duration::from_secs(4));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let (result, attempts) = run_with_retry(&tiny_policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StageError::Gateway(GatewayError::RateLimited))
                } else {
                    Ok("done")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let (result, attempts) = run_with_retry(&tiny_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(StageError::Parse("bad shape".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_last_error() {
        let (result, attempts) = run_with_retry(&tiny_policy(2), || async {
            Err::<(), _>(StageError::Gateway(GatewayError::Timeout))
        })
        .await;
        assert!(matches!(
            result,
            Err(StageError::Gateway(GatewayError::Timeout))
        ));
        assert_eq!(attempts, 2);
    }
}
