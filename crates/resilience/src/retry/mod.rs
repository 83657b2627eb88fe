//! Retry with exponential backoff and jitter
//!
//! [`retry`] runs an operation under a [`RetryPolicy`], sleeping between
//! attempts for the delay computed by [`calculate_backoff`]. Every wait races
//! the caller's [`Context`](bulwark_core::Context).
//!
//! ```rust,no_run
//! use bulwark_core::{Context, Error};
//! use bulwark_resilience::retry::{retry, RetryPolicy};
//!
//! # async fn example() -> bulwark_core::Result<()> {
//! let policy = RetryPolicy::for_network();
//! let body = retry(&Context::background(), &policy, || async {
//!     Err::<String, _>(Error::network("releases.example.com", "connection reset"))
//! })
//! .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod executor;
mod policy;

pub use backoff::calculate_backoff;
pub use executor::{retry, retry_with_circuit_breaker, suggest_recovery};
pub use policy::{is_retryable_error, RetryPolicy};
