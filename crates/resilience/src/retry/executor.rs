//! Retry execution and recovery suggestions.

use super::backoff::calculate_backoff;
use super::policy::RetryPolicy;
use crate::circuit::CircuitBreaker;
use bulwark_core::{Context, Error, Result};
use std::future::Future;
use tracing::{debug, info, warn};

/// Execute an operation with retry logic
///
/// Runs `operation` up to `policy.max_retries + 1` times. The context is
/// checked before every attempt and races each backoff wait, so cancelling
/// it returns the context's error promptly. Errors the policy does not
/// retry are returned as soon as they occur; otherwise the last error is
/// returned once attempts run out.
pub async fn retry<F, Fut, T>(ctx: &Context, policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts();
    let mut last_error = None;

    for attempt in 0..attempts {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(retries = attempt, "operation succeeded after retries");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if !policy.is_error_retryable(&error) {
            debug!(error = %error, "error is not retryable");
            return Err(error);
        }

        if attempt + 1 < attempts {
            let delay = calculate_backoff(attempt, policy.base_delay, policy.max_delay, policy.use_jitter);
            warn!(
                attempt = attempt + 1,
                max_attempts = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "operation failed, retrying"
            );
            ctx.sleep(delay).await?;
        }
        last_error = Some(error);
    }

    Err(last_error.unwrap_or_else(|| Error::configuration("retry loop ended without an attempt")))
}

/// Retry with circuit breaker protection
///
/// Each attempt goes through `breaker`, so an open circuit surfaces as
/// [`Error::CircuitOpen`] and is retried like any other failure unless the
/// policy's allow-list excludes it.
pub async fn retry_with_circuit_breaker<F, Fut, T>(
    ctx: &Context,
    policy: &RetryPolicy,
    breaker: &CircuitBreaker,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry(ctx, policy, || breaker.call(ctx, &operation)).await
}

/// Helper to suggest recovery actions based on error type
pub fn suggest_recovery(error: &Error) -> String {
    match error {
        Error::CircuitOpen => "Circuit breaker is open: the dependency failed repeatedly. \
             Wait for the breaker timeout to elapse before retrying."
            .to_string(),
        Error::Client { message } => {
            format!("Client error: {message}. Fix the request; retrying will not help.")
        }
        Error::Canceled => "Operation was canceled before it completed.".to_string(),
        Error::DeadlineExceeded => "Deadline exceeded: allow more time for the operation \
             or reduce the work it performs."
            .to_string(),
        Error::Network { .. } => "Network error: Check your internet connection and try again. \
             If the problem persists, the service may be temporarily unavailable."
            .to_string(),
        Error::Http { status, .. } if *status >= 500 => {
            format!("Server returned HTTP {status}: the service may be temporarily unavailable. Try again later.")
        }
        Error::Http { status, .. } => {
            format!("Request rejected with HTTP {status}: check the URL and credentials.")
        }
        Error::CommandExecution { .. } => {
            "Command execution failed: Ensure the command is installed and in your PATH. \
             Check the command syntax and arguments."
                .to_string()
        }
        Error::Timeout { .. } => "Operation timed out: The operation took too long to complete. \
             Try again or increase the timeout if possible."
            .to_string(),
        Error::Configuration { message } => {
            format!("Configuration error: {message}. Check your settings file and BULWARK_* environment variables.")
        }
        Error::Io { .. } => "I/O error: Check file permissions and disk space. \
             Ensure the path exists and is accessible."
            .to_string(),
        Error::Json { message, .. } => {
            format!("JSON processing error: {message}. Ensure the data is valid JSON format.")
        }
        Error::Context { source, .. } => suggest_recovery(source),
        Error::Operation { .. } => "An error occurred. Please check the logs for more details.".to_string(),
    }
}
