//! Bounded exponential-backoff retry for remote operations.
//!
//! Every remote call in this crate (source page fetch, target record
//! creation, inventory query) goes through [`with_retry`], parameterized by
//! a [`RetryPolicy`]. All failures are retried identically up to the attempt
//! budget; the caller only ever observes terminal success or the last error.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::sync::{MAX_RETRY_DELAY, ProgressCallback, SyncProgress, emit};

/// Retry policy for a class of remote operations.
///
/// Attempt `n` (1-based) that fails is followed by a delay of
/// `min_delay * backoff_factor^(n-1)` before attempt `n+1`, capped at
/// [`MAX_RETRY_DELAY`], until `max_attempts` attempts have been made.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first attempt.
    pub max_attempts: u32,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_factor: f32,
    /// Delay before the first retry.
    pub min_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy from its three parameters.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_factor: f32, min_delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff_factor,
            min_delay,
        }
    }

    /// Build the backoff strategy for this policy.
    ///
    /// `max_times` counts retries, not attempts, hence the `- 1`.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(MAX_RETRY_DELAY)
            .with_factor(self.backoff_factor)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Execute an async operation, retrying on any failure per `policy`.
///
/// Emits one diagnostic per retry (a `tracing` debug line plus an optional
/// [`SyncProgress::RetryBackoff`] event). On exhaustion the last error is
/// returned unchanged; no error classification is performed.
pub async fn with_retry<T, E, F, Fut>(
    mut operation: F,
    policy: RetryPolicy,
    label: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    retry_op
        .retry(policy.into_backoff())
        .notify(|err, dur| {
            let current_attempt = attempt.load(Ordering::SeqCst);
            emit(
                on_progress,
                SyncProgress::RetryBackoff {
                    label: label.to_string(),
                    retry_after_ms: dur.as_millis() as u64,
                    attempt: current_attempt,
                },
            );
            tracing::debug!(
                "{} failed (attempt {}), retrying in {:?}: {}",
                label,
                current_attempt,
                dur,
                err
            );
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct TestError(&'static str);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, 2.0, Duration::from_millis(1))
    }

    #[test]
    fn policy_backoff_counts_retries_not_attempts() {
        // A 1-attempt policy must never retry.
        let policy = RetryPolicy::new(1, 2.0, Duration::from_millis(1));
        let _backoff = policy.into_backoff();
        assert_eq!(policy.max_attempts.saturating_sub(1), 0);
    }

    #[tokio::test]
    async fn succeeds_first_try_without_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let result: Result<u32, TestError> = with_retry(
            move || {
                let calls_capture = Arc::clone(&calls_capture);
                async move {
                    calls_capture.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                }
            },
            fast_policy(5),
            "test op",
            None,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausts_exactly_max_attempts_then_raises() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let result: Result<(), TestError> = with_retry(
            move || {
                let calls_capture = Arc::clone(&calls_capture);
                async move {
                    calls_capture.fetch_add(1, Ordering::SeqCst);
                    Err(TestError("always fails"))
                }
            },
            fast_policy(4),
            "test op",
            None,
        )
        .await;

        let err = result.expect_err("expected exhaustion");
        assert_eq!(err.to_string(), "always fails");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures_and_emits_progress() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let events: Arc<Mutex<Vec<SyncProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let events_capture = Arc::clone(&events);
        let callback: ProgressCallback = Arc::new(move |event| {
            events_capture
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        });

        let result: Result<u32, TestError> = with_retry(
            move || {
                let calls_capture = Arc::clone(&calls_capture);
                async move {
                    let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(TestError("flaky"))
                    } else {
                        Ok(42)
                    }
                }
            },
            fast_policy(5),
            "flaky op",
            Some(&callback),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        let backoffs = events
            .iter()
            .filter(|e| matches!(e, SyncProgress::RetryBackoff { .. }))
            .count();
        assert_eq!(backoffs, 2);
    }
}
