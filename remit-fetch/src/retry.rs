//! Retry policy for gateway requests.
//!
//! The policy is computed once per request from its method and whether an
//! idempotency key is attached, then handed to [`RetryPolicy::execute`],
//! which knows nothing about HTTP.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use tracing::warn;

use crate::request::is_safe_method;

/// Attempts made by a retryable request.
const RETRYABLE_ATTEMPTS: u32 = 2;

/// How a single request reacts to transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Whether a transport failure may be retried at all.
    pub retryable: bool,
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed delay before each retry.
    pub backoff: Duration,
}

/// The final error of an exhausted [`RetryPolicy::execute`] run.
#[derive(Debug)]
pub struct RetryFailure<E> {
    /// Error from the last attempt.
    pub error: E,
    /// Attempts made.
    pub attempts: u32,
}

impl RetryPolicy {
    /// Computes the policy for a request.
    ///
    /// Safe methods, and unsafe methods carrying an idempotency key, get
    /// one retry. Anything else is attempted once so a non-idempotent side
    /// effect is never duplicated.
    pub fn for_request(method: &Method, has_idempotency_key: bool, backoff: Duration) -> Self {
        if is_safe_method(method) || has_idempotency_key {
            Self {
                retryable: true,
                max_attempts: RETRYABLE_ATTEMPTS,
                backoff,
            }
        } else {
            Self::no_retry()
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            retryable: false,
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Runs `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number. Attempts run strictly in
    /// sequence with `backoff` between them.
    pub async fn execute<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryFailure<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts => {
                    warn!(
                        error = %error,
                        attempt = attempt,
                        delay_ms = u64::try_from(self.backoff.as_millis()).unwrap_or(u64::MAX),
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(error) => {
                    return Err(RetryFailure {
                        error,
                        attempts: attempt,
                    });
                }
            }
        }
    }
}
