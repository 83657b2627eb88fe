//! Plain-data settings for the resilience primitives
//!
//! Settings are what a configuration file or the environment can express:
//! numbers, names and flags. Runtime configs in `bulwark-resilience` are
//! built from these and add the callbacks, which cannot be serialised.
//!
//! Missing fields take the defaults, so an empty document is valid. Zero
//! durations and thresholds also fall back to the defaults.

use crate::constants::*;
use crate::errors::{Error, ErrorKind, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Circuit breaker settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    /// Name used in log events
    pub name: Option<String>,
    /// Consecutive failures before the circuit opens
    pub threshold: u32,
    /// How long the circuit stays open before allowing a trial call
    pub timeout_ms: u64,
}

impl CircuitBreakerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Retry policy settings
///
/// Defaults to 3 retries, 100ms base delay, 30s max delay and jitter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt; `0` disables retrying
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub use_jitter: bool,
    /// Allow-list of retryable error kinds; empty retries everything
    /// that is not a client or context error
    pub retryable_errors: Vec<ErrorKind>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            max_delay_ms: DEFAULT_MAX_DELAY.as_millis() as u64,
            use_jitter: true,
            retryable_errors: Vec::new(),
        }
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Health checker settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckSettings {
    pub name: Option<String>,
    pub interval_ms: u64,
    /// Probe timeout; zero leaves the probe unbounded
    pub timeout_ms: u64,
}

impl HealthCheckSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Resource monitor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceMonitorSettings {
    /// Memory usage percentage (0-100) above which an alert fires
    pub memory_threshold: f64,
    /// Thread count above which an alert fires
    pub thread_threshold: usize,
    pub interval_ms: u64,
}

impl ResourceMonitorSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// All resilience settings in one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    pub circuit_breaker: CircuitBreakerSettings,
    pub retry: RetrySettings,
    pub health_check: HealthCheckSettings,
    pub resource_monitor: ResourceMonitorSettings,
}

impl ResilienceSettings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse resilience settings")
    }

    /// Defaults with `BULWARK_*` environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Overwrite fields from any `BULWARK_*` variables that are set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        override_from_env(
            BULWARK_BREAKER_THRESHOLD_VAR,
            &mut self.circuit_breaker.threshold,
        )?;
        override_from_env(
            BULWARK_BREAKER_TIMEOUT_MS_VAR,
            &mut self.circuit_breaker.timeout_ms,
        )?;
        override_from_env(BULWARK_RETRY_MAX_RETRIES_VAR, &mut self.retry.max_retries)?;
        override_from_env(
            BULWARK_RETRY_BASE_DELAY_MS_VAR,
            &mut self.retry.base_delay_ms,
        )?;
        override_from_env(BULWARK_RETRY_MAX_DELAY_MS_VAR, &mut self.retry.max_delay_ms)?;
        override_from_env(BULWARK_RETRY_JITTER_VAR, &mut self.retry.use_jitter)?;
        override_from_env(
            BULWARK_HEALTH_INTERVAL_MS_VAR,
            &mut self.health_check.interval_ms,
        )?;
        override_from_env(
            BULWARK_HEALTH_TIMEOUT_MS_VAR,
            &mut self.health_check.timeout_ms,
        )?;
        override_from_env(
            BULWARK_MONITOR_MEMORY_PERCENT_VAR,
            &mut self.resource_monitor.memory_threshold,
        )?;
        override_from_env(
            BULWARK_MONITOR_THREAD_THRESHOLD_VAR,
            &mut self.resource_monitor.thread_threshold,
        )?;
        override_from_env(
            BULWARK_MONITOR_INTERVAL_MS_VAR,
            &mut self.resource_monitor.interval_ms,
        )?;
        Ok(())
    }
}

fn override_from_env<T>(variable: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = std::env::var(variable) else {
        return Ok(());
    };

    *target = raw.trim().parse().map_err(|e| {
        Error::configuration(format!("invalid value '{raw}' for {variable}: {e}"))
    })?;
    tracing::debug!(variable, value = %raw, "applied environment override");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_empty_document_is_all_defaults() {
        let settings = ResilienceSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, ResilienceSettings::default());
    }

    #[test]
    fn test_missing_retry_fields_take_policy_defaults() {
        let settings = ResilienceSettings::from_json_str(r#"{ "retry": { "max_delay_ms": 500 } }"#)
            .unwrap();

        assert_eq!(settings.retry.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(settings.retry.base_delay(), DEFAULT_BASE_DELAY);
        assert_eq!(settings.retry.max_delay(), Duration::from_millis(500));
        assert!(settings.retry.use_jitter);

        let explicit = ResilienceSettings::from_json_str(
            r#"{ "retry": { "max_retries": 0, "use_jitter": false } }"#,
        )
        .unwrap();
        assert_eq!(explicit.retry.max_retries, 0);
        assert!(!explicit.retry.use_jitter);
    }

    #[test]
    fn test_partial_document() {
        let settings = ResilienceSettings::from_json_str(
            r#"{
                "circuit_breaker": { "name": "releases", "threshold": 3, "timeout_ms": 5000 },
                "retry": { "max_retries": 4, "use_jitter": true, "retryable_errors": ["network", "timeout"] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.circuit_breaker.name.as_deref(), Some("releases"));
        assert_eq!(settings.circuit_breaker.threshold, 3);
        assert_eq!(settings.circuit_breaker.timeout(), Duration::from_secs(5));
        assert_eq!(settings.retry.max_retries, 4);
        assert!(settings.retry.use_jitter);
        assert_eq!(
            settings.retry.retryable_errors,
            vec![ErrorKind::Network, ErrorKind::Timeout]
        );
        assert_eq!(settings.health_check, HealthCheckSettings::default());
    }

    #[test]
    fn test_invalid_document_is_json_error() {
        let err = ResilienceSettings::from_json_str(r#"{ "retry": { "max_retries": "many" } }"#)
            .unwrap_err();
        assert!(err.is(ErrorKind::Json));
        assert!(err
            .to_string()
            .starts_with("failed to parse resilience settings"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var(BULWARK_BREAKER_THRESHOLD_VAR, "7");
        std::env::set_var(BULWARK_RETRY_JITTER_VAR, "false");
        std::env::set_var(BULWARK_MONITOR_MEMORY_PERCENT_VAR, "65.5");

        let settings = ResilienceSettings::from_env();

        std::env::remove_var(BULWARK_BREAKER_THRESHOLD_VAR);
        std::env::remove_var(BULWARK_RETRY_JITTER_VAR);
        std::env::remove_var(BULWARK_MONITOR_MEMORY_PERCENT_VAR);

        let settings = settings.unwrap();
        assert_eq!(settings.circuit_breaker.threshold, 7);
        assert!(!settings.retry.use_jitter);
        assert_eq!(settings.resource_monitor.memory_threshold, 65.5);
    }

    #[test]
    #[serial]
    fn test_malformed_env_override_is_configuration_error() {
        std::env::set_var(BULWARK_RETRY_MAX_RETRIES_VAR, "lots");
        let result = ResilienceSettings::from_env();
        std::env::remove_var(BULWARK_RETRY_MAX_RETRIES_VAR);

        let err = result.unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
        assert!(err.to_string().contains(BULWARK_RETRY_MAX_RETRIES_VAR));
    }
}
