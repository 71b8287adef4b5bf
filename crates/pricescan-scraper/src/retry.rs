//! Retry with a fixed pause and an attempt cap.
//!
//! [`retry_with_attempt_cap`] is the single retry primitive every marketplace
//! uses for page loads. Non-transient driver errors (a closed session, an
//! invalid selector) are returned immediately without retrying.

use std::time::Duration;

use crate::error::DriverError;

/// Runs `operation` up to `max_attempts` times, sleeping `pause` between
/// failed attempts. The attempt number (starting at 1) is passed in.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-transient error.
pub async fn retry_with_attempt_cap<T, F>(
    max_attempts: u32,
    pause: Duration,
    mut operation: F,
) -> Result<T, DriverError>
where
    F: AsyncFnMut(u32) -> Result<T, DriverError>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "attempt failed, retrying after pause"
                );
                tokio::time::sleep(pause).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn timeout() -> DriverError {
        DriverError::Timeout {
            operation: "navigate".to_owned(),
            timeout_ms: 30_000,
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = AtomicU32::new(0);
        let result = retry_with_attempt_cap(3, Duration::ZERO, async |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, DriverError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = retry_with_attempt_cap(3, Duration::ZERO, async |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            if attempt < 3 {
                Err(timeout())
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_cap() {
        let calls = AtomicU32::new(0);
        let result = retry_with_attempt_cap(3, Duration::ZERO, async |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(timeout())
        })
        .await;
        assert!(matches!(result, Err(DriverError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_closed_session() {
        let calls = AtomicU32::new(0);
        let result = retry_with_attempt_cap(3, Duration::ZERO, async |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(DriverError::Closed)
        })
        .await;
        assert!(matches!(result, Err(DriverError::Closed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Closed must not be retried");
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_between_attempts() {
        let start = tokio::time::Instant::now();
        let _ = retry_with_attempt_cap(3, Duration::from_secs(1), async |_| Err::<(), _>(timeout())).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
