//! Cumulative call metrics for circuit breaker.

use serde::{Deserialize, Serialize};

/// Cumulative counters; never reset by state transitions or `reset()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerMetrics {
    /// Every call that reached the breaker, including rejected ones
    pub total_calls: u64,
    pub success_count: u64,
    pub failure_count: u64,
}

impl CircuitBreakerMetrics {
    /// Calls refused without running the operation
    pub fn rejected_count(&self) -> u64 {
        self.total_calls
            .saturating_sub(self.success_count + self.failure_count)
    }

    /// Fraction of executed calls that failed, 0.0 when nothing ran
    pub fn failure_rate(&self) -> f64 {
        let executed = self.success_count + self.failure_count;
        if executed == 0 {
            0.0
        } else {
            self.failure_count as f64 / executed as f64
        }
    }

    pub(crate) fn record_rejection(&mut self) {
        self.total_calls += 1;
    }

    pub(crate) fn record_success(&mut self) {
        self.total_calls += 1;
        self.success_count += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.total_calls += 1;
        self.failure_count += 1;
    }
}
