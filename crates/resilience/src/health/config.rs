//! Configuration for health checkers.

use super::types::{CheckFn, HealthStatus, StatusChangeCallback};
use crate::circuit::CircuitBreaker;
use bulwark_core::constants::{DEFAULT_HEALTH_CHECK_INTERVAL, DEFAULT_HEALTH_CHECK_NAME};
use bulwark_core::settings::HealthCheckSettings;
use bulwark_core::{Context, Result};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a [`HealthChecker`](super::HealthChecker)
///
/// A zero `interval` becomes the default interval. A zero `timeout` leaves
/// the probe bounded only by the caller's context.
#[derive(Clone, Default)]
pub struct HealthCheckerConfig {
    pub name: String,
    /// Time between background checks
    pub interval: Duration,
    /// Upper bound for a single probe
    pub timeout: Duration,
    pub check_fn: Option<CheckFn>,
    /// Breaker guarding the same dependency, reported alongside the status
    pub circuit_breaker: Option<Arc<CircuitBreaker>>,
    pub on_status_change: Option<StatusChangeCallback>,
}

impl HealthCheckerConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the probe
    pub fn with_check<F, Fut>(mut self, check: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.check_fn = Some(Arc::new(move |ctx| check(ctx).boxed()));
        self
    }

    pub fn with_circuit_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.circuit_breaker = Some(breaker);
        self
    }

    pub fn on_status_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(HealthStatus, HealthStatus) + Send + Sync + 'static,
    {
        self.on_status_change = Some(Arc::new(callback));
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        if self.name.is_empty() {
            self.name = DEFAULT_HEALTH_CHECK_NAME.to_string();
        }
        if self.interval.is_zero() {
            self.interval = DEFAULT_HEALTH_CHECK_INTERVAL;
        }
        self
    }
}

impl fmt::Debug for HealthCheckerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthCheckerConfig")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("check_fn", &self.check_fn.as_ref().map(|_| "<probe>"))
            .field(
                "circuit_breaker",
                &self.circuit_breaker.as_ref().map(|cb| cb.name().to_string()),
            )
            .field(
                "on_status_change",
                &self.on_status_change.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl From<&HealthCheckSettings> for HealthCheckerConfig {
    fn from(settings: &HealthCheckSettings) -> Self {
        Self {
            name: settings.name.clone().unwrap_or_default(),
            interval: settings.interval(),
            timeout: settings.timeout(),
            ..Self::default()
        }
    }
}
