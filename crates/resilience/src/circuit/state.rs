//! Circuit breaker state management and execution logic.

use super::config::CircuitBreakerConfig;
use super::metrics::CircuitBreakerMetrics;
use super::transitions::{Admission, BreakerCore};
use super::types::{CircuitState, StateChangeCallback, Transition};
use bulwark_core::{Context, Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Circuit breaker implementation
///
/// All mutable state sits behind one lock. State-change callbacks run on
/// the calling task after that lock is released, so a callback may read the
/// breaker but must not call `call` or `reset` on it.
pub struct CircuitBreaker {
    name: String,
    threshold: u32,
    timeout: Duration,
    on_state_change: Option<StateChangeCallback>,
    core: Mutex<BreakerCore>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let config = config.normalized();

        debug!(
            breaker = %config.name,
            threshold = config.threshold,
            timeout_ms = config.timeout.as_millis() as u64,
            "circuit breaker initialized"
        );

        Self {
            name: config.name,
            threshold: config.threshold,
            timeout: config.timeout,
            on_state_change: config.on_state_change,
            core: Mutex::new(BreakerCore::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the current state of the circuit
    ///
    /// An open circuit whose timeout has elapsed is reported, and recorded,
    /// as half-open without running anything.
    pub fn state(&self) -> CircuitState {
        let (state, transition) = {
            let mut core = self.core.lock();
            let transition = core.evaluate(Instant::now(), self.timeout);
            (core.state, transition)
        };
        self.notify(transition);
        state
    }

    /// Consecutive failures since the last success or reset
    pub fn failure_count(&self) -> u32 {
        self.core.lock().failure_count
    }

    /// Snapshot of the cumulative call counters
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        self.core.lock().metrics
    }

    /// Force the circuit closed and clear the failure count
    pub fn reset(&self) {
        let transition = self.core.lock().reset();
        self.notify(transition);
    }

    /// Execute an operation through the circuit breaker
    ///
    /// A context that is already done short-circuits without touching any
    /// counter. An open circuit returns [`Error::CircuitOpen`] without running
    /// `operation`. Otherwise the operation's own result is returned as is.
    pub async fn call<F, Fut, T>(&self, ctx: &Context, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let (admission, transition) = {
            let mut core = self.core.lock();
            let transition = core.evaluate(Instant::now(), self.timeout);
            (core.admit(), transition)
        };
        self.notify(transition);

        let trial = match admission {
            Admission::Run => false,
            Admission::Trial => true,
            Admission::Reject => {
                debug!(breaker = %self.name, "circuit open, call rejected");
                return Err(Error::CircuitOpen);
            }
        };

        let mut guard = TrialGuard {
            core: &self.core,
            armed: trial,
        };
        let result = operation().await;
        guard.armed = false;

        let transition = {
            let mut core = self.core.lock();
            match &result {
                Ok(_) => core.record_success(trial),
                Err(_) => core.record_failure(Instant::now(), self.threshold, trial),
            }
        };

        match &result {
            Ok(_) => debug!(breaker = %self.name, "operation succeeded"),
            Err(e) => debug!(breaker = %self.name, error = %e, "operation failed"),
        }
        self.notify(transition);

        result
    }

    fn notify(&self, transition: Option<Transition>) {
        let Some(Transition { from, to }) = transition else {
            return;
        };

        match to {
            CircuitState::Open => {
                warn!(breaker = %self.name, %from, %to, "circuit breaker opening")
            }
            CircuitState::HalfOpen => {
                info!(breaker = %self.name, %from, %to, "circuit breaker entering half-open state")
            }
            CircuitState::Closed => {
                info!(breaker = %self.name, %from, %to, "circuit breaker closing")
            }
        }

        if let Some(callback) = &self.on_state_change {
            callback(from, to);
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.lock();
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("timeout", &self.timeout)
            .field("state", &core.state)
            .field("failure_count", &core.failure_count)
            .field("metrics", &core.metrics)
            .finish()
    }
}

/// Frees the half-open trial slot if the trial future is dropped mid-flight
struct TrialGuard<'a> {
    core: &'a Mutex<BreakerCore>,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.core.lock().abandon_trial();
        }
    }
}
