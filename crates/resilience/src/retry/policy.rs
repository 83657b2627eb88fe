//! Retry policy and error classification.

use bulwark_core::constants::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES};
use bulwark_core::settings::RetrySettings;
use bulwark_core::{Error, ErrorKind};
use std::time::Duration;

/// Configuration for retry behavior
///
/// A policy is an immutable value; the same policy can drive any number of
/// unrelated `retry` calls at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means a single attempt
    pub max_retries: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Scale delays by a random factor in `[0.5, 1.5)`
    pub use_jitter: bool,
    /// When non-empty, only errors of these kinds are retried
    pub retryable_errors: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            use_jitter: true,
            retryable_errors: Vec::new(),
        }
    }
}

impl RetryPolicy {
    /// Create a retry policy for network operations
    pub fn for_network() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(30),
            use_jitter: true,
            retryable_errors: vec![ErrorKind::Network, ErrorKind::Http, ErrorKind::Timeout],
        }
    }

    /// Create a retry policy for subprocess execution
    pub fn for_command() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            use_jitter: true,
            retryable_errors: vec![ErrorKind::CommandExecution, ErrorKind::Timeout],
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    pub fn with_retryable_errors(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retryable_errors = kinds.into_iter().collect();
        self
    }

    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Check if an error should be retried under this policy
    ///
    /// Context and client errors never are. With a non-empty allow-list the
    /// error, or an error it wraps, must match one of the listed kinds.
    pub fn is_error_retryable(&self, error: &Error) -> bool {
        if error.is_context_error() || error.is_client_error() {
            return false;
        }
        if self.retryable_errors.is_empty() {
            return true;
        }
        self.retryable_errors.iter().any(|kind| error.is(*kind))
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.base_delay(),
            max_delay: settings.max_delay(),
            use_jitter: settings.use_jitter,
            retryable_errors: settings.retryable_errors.clone(),
        }
    }
}

/// Standalone classifier matching the policy's built-in rules
///
/// `None` is not retryable since there is nothing to retry. Context
/// cancellation, deadlines and client errors are not retryable either;
/// everything else is.
pub fn is_retryable_error(error: Option<&Error>) -> bool {
    match error {
        None => false,
        Some(error) => !(error.is_context_error() || error.is_client_error()),
    }
}
