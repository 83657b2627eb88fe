//! Cross-component behavior: settings feeding configs, retries around a
//! breaker, and a health checker probing through the same breaker.

use bulwark_core::constants::{BULWARK_BREAKER_THRESHOLD_VAR, BULWARK_MONITOR_INTERVAL_MS_VAR};
use bulwark_core::settings::ResilienceSettings;
use bulwark_core::{Context, Error, ErrorKind, Result};
use bulwark_resilience::{
    retry, retry_with_circuit_breaker, CircuitBreaker, CircuitBreakerConfig, CircuitState,
    HealthChecker, HealthCheckerConfig, HealthStatus, ResourceMonitor, ResourceMonitorConfig,
    RetryPolicy,
};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SETTINGS: &str = r#"{
    "circuit_breaker": { "name": "releases", "threshold": 2, "timeout_ms": 50 },
    "retry": {
        "max_retries": 4,
        "base_delay_ms": 1,
        "max_delay_ms": 5,
        "use_jitter": false,
        "retryable_errors": ["network", "http"]
    },
    "health_check": { "name": "releases", "interval_ms": 20, "timeout_ms": 30 },
    "resource_monitor": { "memory_threshold": 95.0, "thread_threshold": 4096, "interval_ms": 250 }
}"#;

#[tokio::test]
async fn test_components_built_from_settings() {
    let settings = ResilienceSettings::from_json_str(SETTINGS).unwrap();

    let breaker = CircuitBreaker::new(CircuitBreakerConfig::from(&settings.circuit_breaker));
    assert_eq!(breaker.name(), "releases");
    assert_eq!(breaker.threshold(), 2);
    assert_eq!(breaker.timeout(), Duration::from_millis(50));

    let policy = RetryPolicy::from(&settings.retry);
    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.retryable_errors, vec![ErrorKind::Network, ErrorKind::Http]);

    let checker = HealthChecker::new(HealthCheckerConfig::from(&settings.health_check));
    assert_eq!(checker.name(), "releases");
    assert_eq!(checker.status(), HealthStatus::Unknown);

    let monitor = ResourceMonitor::new(ResourceMonitorConfig::from(&settings.resource_monitor));
    assert_eq!(monitor.thresholds().memory_percent, 95.0);
    assert_eq!(monitor.thresholds().thread_count, 4096);
    assert!(format!("{monitor:?}").contains("interval: 250ms"));
}

#[tokio::test]
async fn test_allow_list_without_circuit_open_stops_at_rejection() {
    let settings = ResilienceSettings::from_json_str(SETTINGS).unwrap();
    let policy = RetryPolicy::from(&settings.retry);
    let breaker = CircuitBreaker::new(
        CircuitBreakerConfig::from(&settings.circuit_breaker).with_timeout(Duration::from_secs(60)),
    );
    let invocations = AtomicUsize::new(0);

    let result: Result<()> = retry_with_circuit_breaker(&Context::background(), &policy, &breaker, || {
        invocations.fetch_add(1, Ordering::SeqCst);
        async { Err(Error::http("https://releases.example.com", 503, "unavailable")) }
    })
    .await;

    // Two failures open the breaker, the rejection is not on the allow-list
    assert!(matches!(result, Err(Error::CircuitOpen)));
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
    assert_eq!(breaker.metrics().rejected_count(), 1);
}

#[tokio::test]
async fn test_retry_recovers_through_half_open_breaker() {
    let breaker = CircuitBreaker::new(
        CircuitBreakerConfig::default()
            .with_threshold(1)
            .with_timeout(Duration::from_millis(20)),
    );
    let policy = RetryPolicy::default()
        .with_max_retries(3)
        .with_base_delay(Duration::from_millis(30))
        .with_jitter(false);
    let invocations = AtomicUsize::new(0);

    let result = retry_with_circuit_breaker(&Context::background(), &policy, &breaker, || {
        let n = invocations.fetch_add(1, Ordering::SeqCst);
        async move {
            if n == 0 {
                Err(Error::network("api", "reset"))
            } else {
                Ok(n)
            }
        }
    })
    .await;

    // The backoff outlasts the breaker timeout, so the second attempt is the trial
    assert_eq!(result.unwrap(), 1);
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_health_checker_checks_through_breaker() {
    let breaker = Arc::new(CircuitBreaker::new(
        CircuitBreakerConfig::default()
            .with_name("registry")
            .with_threshold(2)
            .with_timeout(Duration::from_secs(60)),
    ));
    let reachable = Arc::new(AtomicBool::new(false));

    let checker = HealthChecker::new(
        HealthCheckerConfig::default()
            .with_name("registry")
            .with_circuit_breaker(Arc::clone(&breaker))
            .with_check({
                let breaker = Arc::clone(&breaker);
                let reachable = Arc::clone(&reachable);
                move |ctx: Context| {
                    let breaker = Arc::clone(&breaker);
                    let reachable = Arc::clone(&reachable);
                    async move {
                        breaker
                            .call(&ctx, || async {
                                if reachable.load(Ordering::SeqCst) {
                                    Ok(())
                                } else {
                                    Err(Error::network("registry", "refused"))
                                }
                            })
                            .await
                    }
                }
            }),
    );

    for _ in 0..3 {
        assert_eq!(checker.check(&Context::background()).await, HealthStatus::Unhealthy);
    }

    let report = checker.report();
    assert_eq!(report.circuit_state, Some(CircuitState::Open));
    assert!(checker.last_error().unwrap().is(ErrorKind::CircuitOpen));

    // Recovery needs the breaker reset as well as the dependency
    reachable.store(true, Ordering::SeqCst);
    breaker.reset();
    assert_eq!(checker.check(&Context::background()).await, HealthStatus::Healthy);
    assert_eq!(checker.report().circuit_state, Some(CircuitState::Closed));
}

#[tokio::test]
async fn test_cancelling_shared_context_stops_everything() {
    let ctx = Context::background();
    let checks = Arc::new(AtomicUsize::new(0));
    let checker = HealthChecker::new(
        HealthCheckerConfig::default()
            .with_interval(Duration::from_millis(10))
            .with_check({
                let checks = Arc::clone(&checks);
                move |_ctx| {
                    checks.fetch_add(1, Ordering::SeqCst);
                    async { Ok(()) }
                }
            }),
    );
    let monitor = ResourceMonitor::default();

    checker.start(&ctx);
    monitor.start_monitoring(&ctx, Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let retrying = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let policy = RetryPolicy::default().with_base_delay(Duration::from_secs(30));
            retry(&ctx, &policy, || async { Err::<(), _>(Error::operation("down")) }).await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    ctx.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), retrying)
        .await
        .unwrap()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(matches!(result, Err(Error::Canceled)));
    assert!(!checker.is_running());
    assert!(!monitor.is_running());

    let checks_after = checks.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(checks.load(Ordering::SeqCst), checks_after);
}

#[test]
#[serial]
fn test_env_override_reaches_breaker() {
    std::env::set_var(BULWARK_BREAKER_THRESHOLD_VAR, "7");
    let settings = ResilienceSettings::from_env();
    std::env::remove_var(BULWARK_BREAKER_THRESHOLD_VAR);

    let breaker = CircuitBreaker::new(CircuitBreakerConfig::from(&settings.unwrap().circuit_breaker));
    assert_eq!(breaker.threshold(), 7);
}

#[test]
#[serial]
fn test_env_override_reaches_monitor_interval() {
    std::env::set_var(BULWARK_MONITOR_INTERVAL_MS_VAR, "15");
    let settings = ResilienceSettings::from_env();
    std::env::remove_var(BULWARK_MONITOR_INTERVAL_MS_VAR);

    let config = ResourceMonitorConfig::from(&settings.unwrap().resource_monitor);
    assert_eq!(config.interval, Duration::from_millis(15));
}

#[test]
#[serial]
fn test_malformed_env_override_is_configuration_error() {
    std::env::set_var(BULWARK_BREAKER_THRESHOLD_VAR, "many");
    let result = ResilienceSettings::from_env();
    std::env::remove_var(BULWARK_BREAKER_THRESHOLD_VAR);

    assert!(result.unwrap_err().is(ErrorKind::Configuration));
}
