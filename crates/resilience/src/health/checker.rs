//! Health checker state and background polling.

use super::config::HealthCheckerConfig;
use super::types::{CheckFn, HealthReport, HealthStatus, StatusChangeCallback};
use crate::circuit::CircuitBreaker;
use crate::poller::{run_every, PollerSlot};
use bulwark_core::{Context, Error};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Periodically checks a dependency and caches the outcome
///
/// Cloning is cheap and every clone shares the same status.
#[derive(Clone)]
pub struct HealthChecker {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    interval: Duration,
    timeout: Duration,
    check_fn: Option<CheckFn>,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
    on_status_change: Option<StatusChangeCallback>,
    state: Mutex<HealthState>,
}

#[derive(Default)]
struct HealthState {
    status: HealthStatus,
    last_check: Option<DateTime<Utc>>,
    last_error: Option<Arc<Error>>,
    poller: PollerSlot,
}

impl HealthChecker {
    pub fn new(config: HealthCheckerConfig) -> Self {
        let config = config.normalized();

        debug!(
            health_check = %config.name,
            interval_ms = config.interval.as_millis() as u64,
            timeout_ms = config.timeout.as_millis() as u64,
            "health checker initialized"
        );

        Self {
            inner: Arc::new(Inner {
                name: config.name,
                interval: config.interval,
                timeout: config.timeout,
                check_fn: config.check_fn,
                circuit_breaker: config.circuit_breaker,
                on_status_change: config.on_status_change,
                state: Mutex::new(HealthState::default()),
            }),
        }
    }

    /// Run the probe once and record the outcome
    ///
    /// A context that is already done yields `Unknown` without probing. If
    /// the caller's context finishes while the probe runs, the check is
    /// abandoned: the status becomes `Unknown` and `last_check` and
    /// `last_error` keep their previous values. Hitting the configured
    /// timeout is a probe failure and yields `Unhealthy`.
    pub async fn check(&self, ctx: &Context) -> HealthStatus {
        if ctx.is_done() {
            return self.abandon();
        }

        let Some(check_fn) = &self.inner.check_fn else {
            warn!(health_check = %self.inner.name, "no check function configured");
            return self.abandon();
        };

        let bounded = if self.inner.timeout.is_zero() {
            ctx.clone()
        } else {
            ctx.with_timeout(self.inner.timeout)
        };

        let outcome = match bounded.run(check_fn(bounded.clone())).await {
            Ok(outcome) => outcome,
            Err(_) if ctx.is_done() => return self.abandon(),
            Err(_) => Err(Error::timeout(
                format!("health check '{}'", self.inner.name),
                self.inner.timeout,
            )),
        };

        match outcome {
            Ok(()) => self.record(HealthStatus::Healthy, None),
            Err(e) if e.is_context_error() && ctx.is_done() => self.abandon(),
            Err(e) => {
                debug!(health_check = %self.inner.name, error = %e, "health check failed");
                self.record(HealthStatus::Unhealthy, Some(e))
            }
        }
    }

    /// Start background checks: one immediately, then every interval
    ///
    /// A no-op while a poller is already running. The poller ends when `ctx`
    /// is done or [`stop`](Self::stop) is called.
    pub fn start(&self, ctx: &Context) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(health_check = %self.inner.name, "cannot start health checker outside a Tokio runtime");
            return;
        };

        let Some((id, poll_ctx)) = self.inner.state.lock().poller.claim(ctx) else {
            debug!(health_check = %self.inner.name, "health checker already running");
            return;
        };

        let checker = self.clone();
        runtime.spawn(async move {
            info!(
                health_check = %checker.inner.name,
                interval_ms = checker.inner.interval.as_millis() as u64,
                "health checker started"
            );

            run_every(&poll_ctx, checker.inner.interval, || checker.check(&poll_ctx)).await;

            checker.inner.state.lock().poller.release(id);
            info!(health_check = %checker.inner.name, "health checker stopped");
        });
    }

    /// Signal the background poller to stop; safe to call at any time
    pub fn stop(&self) {
        if self.inner.state.lock().poller.stop() {
            debug!(health_check = %self.inner.name, "health checker stop requested");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.lock().poller.is_running()
    }

    pub fn status(&self) -> HealthStatus {
        self.inner.state.lock().status
    }

    /// When the probe last completed, if ever
    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().last_check
    }

    /// Error from the most recent completed probe, cleared by a success
    pub fn last_error(&self) -> Option<Arc<Error>> {
        self.inner.state.lock().last_error.clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn circuit_breaker(&self) -> Option<&Arc<CircuitBreaker>> {
        self.inner.circuit_breaker.as_ref()
    }

    /// Serializable snapshot of the current state
    pub fn report(&self) -> HealthReport {
        let (status, last_check, last_error) = {
            let state = self.inner.state.lock();
            (
                state.status,
                state.last_check,
                state.last_error.as_ref().map(|e| e.to_string()),
            )
        };

        HealthReport {
            name: self.inner.name.clone(),
            status,
            last_check,
            last_error,
            circuit_state: self.inner.circuit_breaker.as_ref().map(|cb| cb.state()),
        }
    }

    fn record(&self, status: HealthStatus, error: Option<Error>) -> HealthStatus {
        let previous = {
            let mut state = self.inner.state.lock();
            state.last_check = Some(Utc::now());
            state.last_error = error.map(Arc::new);
            std::mem::replace(&mut state.status, status)
        };
        self.notify(previous, status);
        status
    }

    fn abandon(&self) -> HealthStatus {
        let previous = std::mem::replace(&mut self.inner.state.lock().status, HealthStatus::Unknown);
        self.notify(previous, HealthStatus::Unknown);
        HealthStatus::Unknown
    }

    fn notify(&self, from: HealthStatus, to: HealthStatus) {
        if from == to {
            return;
        }

        match to {
            HealthStatus::Unhealthy => {
                warn!(health_check = %self.inner.name, %from, %to, "dependency became unhealthy")
            }
            _ => info!(health_check = %self.inner.name, %from, %to, "health status changed"),
        }

        if let Some(callback) = &self.inner.on_status_change {
            callback(from, to);
        }
    }
}

impl fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("HealthChecker")
            .field("name", &self.inner.name)
            .field("interval", &self.inner.interval)
            .field("timeout", &self.inner.timeout)
            .field("status", &state.status)
            .field("last_check", &state.last_check)
            .field("running", &state.poller.is_running())
            .finish()
    }
}
