//! Circuit breaker guarding calls to a failing dependency
//!
//! The breaker counts consecutive failures. Once `threshold` is reached the
//! circuit opens and calls fail fast with [`Error::CircuitOpen`] until
//! `timeout` has passed. The next call is then a single trial: success
//! closes the circuit, failure opens it again.
//!
//! ## Architecture
//!
//! - [`types`] - `CircuitState` and the callback type
//! - [`config`] - `CircuitBreakerConfig` with default substitution
//! - [`metrics`] - cumulative call counters
//! - [`transitions`] - the lock-protected state machine
//! - [`state`] - `CircuitBreaker`, the public entry point
//!
//! ## Example
//!
//! ```rust,no_run
//! use bulwark_core::{Context, Error};
//! use bulwark_resilience::circuit::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<String, Error> {
//! let cb = CircuitBreaker::new(
//!     CircuitBreakerConfig::default()
//!         .with_name("releases")
//!         .with_threshold(3)
//!         .with_timeout(Duration::from_secs(30)),
//! );
//!
//! cb.call(&Context::background(), || async {
//!     // Your operation here
//!     Ok("v1.2.3".to_string())
//! })
//! .await
//! # }
//! ```
//!
//! [`Error::CircuitOpen`]: bulwark_core::Error::CircuitOpen

pub mod config;
pub mod metrics;
pub mod state;
pub(crate) mod transitions;
pub mod types;

// Re-export public API
pub use config::CircuitBreakerConfig;
pub use metrics::CircuitBreakerMetrics;
pub use state::CircuitBreaker;
pub use types::{CircuitState, StateChangeCallback};
