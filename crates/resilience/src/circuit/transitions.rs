//! State transition logic for circuit breaker.
//!
//! `BreakerCore` is the lock-protected part of a breaker. Every method
//! runs with the lock held and reports the transition it caused, so the
//! caller can log it and fire callbacks once the lock is released.

use super::metrics::CircuitBreakerMetrics;
use super::types::{CircuitState, Transition};
use std::time::{Duration, Instant};

/// Outcome of asking the breaker whether a call may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Closed circuit, run normally
    Run,
    /// Half-open circuit, this call is the single trial
    Trial,
    /// Open circuit, or a trial is already in flight
    Reject,
}

/// Mutable breaker state, always accessed under the breaker lock
#[derive(Debug)]
pub(crate) struct BreakerCore {
    pub state: CircuitState,
    pub failure_count: u32,
    pub opened_at: Option<Instant>,
    pub trial_in_flight: bool,
    pub metrics: CircuitBreakerMetrics,
}

impl BreakerCore {
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            opened_at: None,
            trial_in_flight: false,
            metrics: CircuitBreakerMetrics::default(),
        }
    }

    /// Apply the lazy Open -> HalfOpen transition once `timeout` has elapsed
    pub fn evaluate(&mut self, now: Instant, timeout: Duration) -> Option<Transition> {
        if self.state != CircuitState::Open {
            return None;
        }
        let opened_at = self.opened_at?;
        if now.saturating_duration_since(opened_at) >= timeout {
            Some(self.move_to(CircuitState::HalfOpen))
        } else {
            None
        }
    }

    /// Decide whether a call may run; rejections are counted here
    pub fn admit(&mut self) -> Admission {
        match self.state {
            CircuitState::Closed => Admission::Run,
            CircuitState::HalfOpen if !self.trial_in_flight => {
                self.trial_in_flight = true;
                Admission::Trial
            }
            CircuitState::HalfOpen | CircuitState::Open => {
                self.metrics.record_rejection();
                Admission::Reject
            }
        }
    }

    pub fn record_success(&mut self, trial: bool) -> Option<Transition> {
        self.metrics.record_success();
        self.failure_count = 0;
        if trial {
            self.trial_in_flight = false;
        }

        match self.state {
            CircuitState::HalfOpen => Some(self.move_to(CircuitState::Closed)),
            _ => None,
        }
    }

    pub fn record_failure(&mut self, now: Instant, threshold: u32, trial: bool) -> Option<Transition> {
        self.metrics.record_failure();
        self.failure_count = self.failure_count.saturating_add(1);
        if trial {
            self.trial_in_flight = false;
        }

        match self.state {
            CircuitState::HalfOpen => Some(self.open(now)),
            CircuitState::Closed if self.failure_count >= threshold => Some(self.open(now)),
            _ => None,
        }
    }

    /// The trial call was dropped before it finished
    pub fn abandon_trial(&mut self) {
        self.trial_in_flight = false;
    }

    pub fn reset(&mut self) -> Option<Transition> {
        self.failure_count = 0;
        self.trial_in_flight = false;
        self.opened_at = None;

        if self.state == CircuitState::Closed {
            None
        } else {
            Some(self.move_to(CircuitState::Closed))
        }
    }

    fn open(&mut self, now: Instant) -> Transition {
        self.opened_at = Some(now);
        self.move_to(CircuitState::Open)
    }

    fn move_to(&mut self, to: CircuitState) -> Transition {
        let from = self.state;
        self.state = to;
        Transition { from, to }
    }
}
