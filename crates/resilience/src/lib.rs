//! Fault-tolerance primitives for `bulwark`
//!
//! Four independent building blocks for wrapping operations that can fail:
//!
//! - **`circuit`**: [`CircuitBreaker`] stops calling a dependency after
//!   repeated failures and probes it again after a timeout.
//! - **`retry`**: [`retry`] re-runs an operation with exponential backoff
//!   and jitter, stopping early on errors that cannot succeed on retry.
//! - **`health`**: [`HealthChecker`] probes a dependency on demand or in the
//!   background and caches the result.
//! - **`monitor`**: [`ResourceMonitor`] samples process memory and threads
//!   and alerts when thresholds are crossed.
//!
//! Every operation that can block takes a [`Context`](bulwark_core::Context)
//! and returns promptly once it is cancelled.

pub mod circuit;
pub mod health;
pub mod monitor;
mod poller;
pub mod retry;

pub use circuit::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};
pub use health::{HealthChecker, HealthCheckerConfig, HealthReport, HealthStatus};
pub use monitor::{ResourceMonitor, ResourceMonitorConfig, ResourceStats, ResourceThresholds};
pub use retry::{
    calculate_backoff, is_retryable_error, retry, retry_with_circuit_breaker, suggest_recovery,
    RetryPolicy,
};
