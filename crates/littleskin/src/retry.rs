//! Retry orchestration for the whole login-and-sign task.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::CheckinError;

/// Retry settings for the check-in task.
///
/// The delay is a fixed interval between attempts, not a backoff: the server
/// is not overloaded when a sign fails, the attempt just needs a fresh
/// session some seconds later.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// The closure receives the 1-based attempt number. Fatal errors
/// ([`CheckinError::is_fatal`]) abort immediately since retrying cannot
/// change their outcome; everything else is logged and retried after the
/// fixed delay. Exhaustion wraps the last error so the caller sees the real
/// cause.
pub async fn run_with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, CheckinError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, CheckinError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(
                    attempt,
                    max = max_attempts,
                    error = %err,
                    "Check-in attempt failed"
                );
                if attempt >= max_attempts {
                    return Err(CheckinError::AttemptsExhausted {
                        attempts: max_attempts,
                        last: Box::new(err),
                    });
                }
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
