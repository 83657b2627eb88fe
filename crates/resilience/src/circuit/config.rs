//! Configuration for circuit breaker behavior.

use super::types::{CircuitState, StateChangeCallback};
use bulwark_core::constants::{
    DEFAULT_BREAKER_NAME, DEFAULT_BREAKER_THRESHOLD, DEFAULT_BREAKER_TIMEOUT,
};
use bulwark_core::settings::CircuitBreakerSettings;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for circuit breaker behavior
///
/// Zero values are replaced with defaults when the breaker is built, so
/// `CircuitBreakerConfig::default()` always yields a usable breaker.
#[derive(Clone, Default)]
pub struct CircuitBreakerConfig {
    /// Name used in log events
    pub name: String,
    /// Consecutive failures before the circuit opens
    pub threshold: u32,
    /// How long the circuit stays open before allowing a trial call
    pub timeout: Duration,
    /// Called after every state change, outside the breaker lock
    pub on_state_change: Option<StateChangeCallback>,
}

impl CircuitBreakerConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_state_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.on_state_change = Some(Arc::new(callback));
        self
    }

    /// Copy of this config with defaults substituted for zero values
    pub(crate) fn normalized(mut self) -> Self {
        if self.name.is_empty() {
            self.name = DEFAULT_BREAKER_NAME.to_string();
        }
        if self.threshold == 0 {
            self.threshold = DEFAULT_BREAKER_THRESHOLD;
        }
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_BREAKER_TIMEOUT;
        }
        self
    }
}

impl fmt::Debug for CircuitBreakerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreakerConfig")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("timeout", &self.timeout)
            .field(
                "on_state_change",
                &self.on_state_change.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl From<&CircuitBreakerSettings> for CircuitBreakerConfig {
    fn from(settings: &CircuitBreakerSettings) -> Self {
        Self {
            name: settings.name.clone().unwrap_or_default(),
            threshold: settings.threshold,
            timeout: settings.timeout(),
            on_state_change: None,
        }
    }
}
