//! Health checking for external dependencies
//!
//! A [`HealthChecker`] runs a caller-supplied probe on demand via
//! [`HealthChecker::check`] or in the background via
//! [`HealthChecker::start`], and caches the last status, error and check
//! time. It may reference the [`CircuitBreaker`](crate::circuit::CircuitBreaker)
//! guarding the same dependency; the breaker's state is only reported, never
//! consulted.
//!
//! ```rust,no_run
//! use bulwark_core::{Context, Error};
//! use bulwark_resilience::health::{HealthChecker, HealthCheckerConfig};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let checker = HealthChecker::new(
//!     HealthCheckerConfig::default()
//!         .with_name("releases")
//!         .with_interval(Duration::from_secs(60))
//!         .with_timeout(Duration::from_secs(5))
//!         .with_check(|_ctx| async { Err(Error::network("releases.example.com", "refused")) }),
//! );
//!
//! let ctx = Context::background();
//! checker.start(&ctx);
//! // ...
//! checker.stop();
//! # }
//! ```

mod checker;
mod config;
mod types;

pub use checker::HealthChecker;
pub use config::HealthCheckerConfig;
pub use types::{CheckFn, HealthReport, HealthStatus, StatusChangeCallback};
