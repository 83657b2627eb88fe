/// Constants used throughout the bulwark codebase
use std::time::Duration;

// Circuit breaker defaults
pub const DEFAULT_BREAKER_NAME: &str = "circuit-breaker";
pub const DEFAULT_BREAKER_THRESHOLD: u32 = 5;
pub const DEFAULT_BREAKER_TIMEOUT: Duration = Duration::from_secs(30);

// Retry and backoff defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

// Jitter multiplies the delay by a factor drawn from [MIN, MAX)
pub const JITTER_FACTOR_MIN: f64 = 0.5;
pub const JITTER_FACTOR_MAX: f64 = 1.5;

// Health check defaults
pub const DEFAULT_HEALTH_CHECK_NAME: &str = "health-check";
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

// Resource monitor defaults
pub const DEFAULT_MEMORY_THRESHOLD_PERCENT: f64 = 80.0;
pub const DEFAULT_THREAD_THRESHOLD: usize = 1000;
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(30);

// Environment variable names
pub const BULWARK_LOG_VAR: &str = "BULWARK_LOG";
pub const BULWARK_BREAKER_THRESHOLD_VAR: &str = "BULWARK_BREAKER_THRESHOLD";
pub const BULWARK_BREAKER_TIMEOUT_MS_VAR: &str = "BULWARK_BREAKER_TIMEOUT_MS";
pub const BULWARK_RETRY_MAX_RETRIES_VAR: &str = "BULWARK_RETRY_MAX_RETRIES";
pub const BULWARK_RETRY_BASE_DELAY_MS_VAR: &str = "BULWARK_RETRY_BASE_DELAY_MS";
pub const BULWARK_RETRY_MAX_DELAY_MS_VAR: &str = "BULWARK_RETRY_MAX_DELAY_MS";
pub const BULWARK_RETRY_JITTER_VAR: &str = "BULWARK_RETRY_JITTER";
pub const BULWARK_HEALTH_INTERVAL_MS_VAR: &str = "BULWARK_HEALTH_INTERVAL_MS";
pub const BULWARK_HEALTH_TIMEOUT_MS_VAR: &str = "BULWARK_HEALTH_TIMEOUT_MS";
pub const BULWARK_MONITOR_MEMORY_PERCENT_VAR: &str = "BULWARK_MONITOR_MEMORY_PERCENT";
pub const BULWARK_MONITOR_THREAD_THRESHOLD_VAR: &str = "BULWARK_MONITOR_THREAD_THRESHOLD";
pub const BULWARK_MONITOR_INTERVAL_MS_VAR: &str = "BULWARK_MONITOR_INTERVAL_MS";

// Default log filter when neither RUST_LOG nor BULWARK_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info";
