//! Shared retry/backoff policy for remote operations
//!
//! Album creation and item upload share one exponential-backoff loop. Only
//! transient (server 5xx) errors are retried; everything else propagates
//! immediately.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Exponential backoff parameters.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first attempt
    pub attempts: u32,
    pub initial_delay: Duration,
    /// Delay multiplier applied after each failed attempt
    pub backoff: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            initial_delay: Duration::from_millis(200),
            backoff: 2,
        }
    }
}

/// Run `operation` under the policy, retrying transient remote errors.
///
/// Exhausting the budget yields `Error::RetryExhausted` naming the operation
/// and wrapping the last transient error.
pub async fn retry_remote<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 1..=policy.attempts {
        if attempt > 1 {
            tracing::info!(operation = operation_name, attempt, "Retrying");
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    error = %err,
                    "Transient remote error"
                );
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }

        tracing::info!(
            operation = operation_name,
            delay_ms = delay.as_millis() as u64,
            "Sleeping before retry"
        );
        tokio::time::sleep(delay).await;
        delay *= policy.backoff;
    }

    Err(Error::RetryExhausted {
        operation: operation_name.to_string(),
        attempts: policy.attempts,
        source: Box::new(last_error.unwrap_or_else(|| Error::TransientRemote {
            status: 0,
            message: "no attempt recorded".to_string(),
        })),
    })
}
