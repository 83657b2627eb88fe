//! Configuration for the resource monitor.

use super::types::{ResourceStats, ResourceThresholds, StatsCallback};
use bulwark_core::constants::DEFAULT_MONITOR_INTERVAL;
use bulwark_core::settings::ResourceMonitorSettings;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a [`ResourceMonitor`](super::ResourceMonitor)
///
/// Zero thresholds fall back to 80% memory and 1000 threads. A zero
/// interval falls back to 30s.
#[derive(Clone, Default)]
pub struct ResourceMonitorConfig {
    /// Memory percentage (0-100) above which `on_high_memory` fires
    pub memory_threshold: f64,
    /// Thread count above which `on_high_threads` fires
    pub thread_threshold: usize,
    /// Sampling period used when `start_monitoring` is given a zero interval
    pub interval: Duration,
    pub on_stats_update: Option<StatsCallback>,
    pub on_high_memory: Option<StatsCallback>,
    pub on_high_threads: Option<StatsCallback>,
}

impl ResourceMonitorConfig {
    pub fn with_memory_threshold(mut self, percent: f64) -> Self {
        self.memory_threshold = percent;
        self
    }

    pub fn with_thread_threshold(mut self, count: usize) -> Self {
        self.thread_threshold = count;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn on_stats_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResourceStats) + Send + Sync + 'static,
    {
        self.on_stats_update = Some(Arc::new(callback));
        self
    }

    pub fn on_high_memory<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResourceStats) + Send + Sync + 'static,
    {
        self.on_high_memory = Some(Arc::new(callback));
        self
    }

    pub fn on_high_threads<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResourceStats) + Send + Sync + 'static,
    {
        self.on_high_threads = Some(Arc::new(callback));
        self
    }

    /// Configured interval, or the default when zero
    pub(crate) fn interval(&self) -> Duration {
        if self.interval.is_zero() {
            DEFAULT_MONITOR_INTERVAL
        } else {
            self.interval
        }
    }

    /// Thresholds with defaults substituted for zero values
    pub(crate) fn thresholds(&self) -> ResourceThresholds {
        let defaults = ResourceThresholds::default();
        ResourceThresholds {
            memory_percent: if self.memory_threshold > 0.0 {
                self.memory_threshold
            } else {
                defaults.memory_percent
            },
            thread_count: if self.thread_threshold > 0 {
                self.thread_threshold
            } else {
                defaults.thread_count
            },
        }
    }
}

impl fmt::Debug for ResourceMonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callback = |cb: &Option<StatsCallback>| cb.as_ref().map(|_| "<callback>");
        f.debug_struct("ResourceMonitorConfig")
            .field("memory_threshold", &self.memory_threshold)
            .field("thread_threshold", &self.thread_threshold)
            .field("interval", &self.interval)
            .field("on_stats_update", &callback(&self.on_stats_update))
            .field("on_high_memory", &callback(&self.on_high_memory))
            .field("on_high_threads", &callback(&self.on_high_threads))
            .finish()
    }
}

impl From<&ResourceMonitorSettings> for ResourceMonitorConfig {
    fn from(settings: &ResourceMonitorSettings) -> Self {
        Self {
            memory_threshold: settings.memory_threshold,
            thread_threshold: settings.thread_threshold,
            interval: settings.interval(),
            ..Self::default()
        }
    }
}
