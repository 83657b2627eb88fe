//! Periodic resource sampling with threshold alerts.

use super::config::ResourceMonitorConfig;
use super::sampler::Sampler;
use super::types::{ResourceStats, ResourceThresholds, StatsCallback};
use crate::poller::{run_every, PollerSlot};
use bulwark_core::{Context, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Samples process memory and thread usage and alerts on thresholds
///
/// Cloning is cheap and every clone shares the same thresholds and poller.
#[derive(Clone)]
pub struct ResourceMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    interval: Duration,
    on_stats_update: Option<StatsCallback>,
    on_high_memory: Option<StatsCallback>,
    on_high_threads: Option<StatsCallback>,
    sampler: Sampler,
    state: Mutex<MonitorState>,
}

struct MonitorState {
    thresholds: ResourceThresholds,
    poller: PollerSlot,
}

impl ResourceMonitor {
    pub fn new(config: ResourceMonitorConfig) -> Self {
        let thresholds = config.thresholds();

        Self {
            inner: Arc::new(Inner {
                interval: config.interval(),
                on_stats_update: config.on_stats_update,
                on_high_memory: config.on_high_memory,
                on_high_threads: config.on_high_threads,
                sampler: Sampler::new(),
                state: Mutex::new(MonitorState {
                    thresholds,
                    poller: PollerSlot::default(),
                }),
            }),
        }
    }

    /// Take a fresh snapshot without firing any callback
    pub fn get_stats(&self) -> Result<ResourceStats> {
        self.inner.sampler.sample()
    }

    pub fn thresholds(&self) -> ResourceThresholds {
        self.inner.state.lock().thresholds
    }

    /// Replace the thresholds; the poller uses them from its next tick
    pub fn set_thresholds(&self, thresholds: ResourceThresholds) {
        self.inner.state.lock().thresholds = thresholds;
    }

    /// Sample immediately and then every `interval` in the background
    ///
    /// A zero interval uses the configured one, or 30s when that is zero
    /// too. A no-op while a poller is already
    /// running. The poller ends when `ctx` is done or [`stop`](Self::stop)
    /// is called.
    pub fn start_monitoring(&self, ctx: &Context, interval: Duration) {
        let interval = if interval.is_zero() {
            self.inner.interval
        } else {
            interval
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!("cannot start resource monitor outside a Tokio runtime");
            return;
        };

        let Some((id, poll_ctx)) = self.inner.state.lock().poller.claim(ctx) else {
            debug!("resource monitor already running");
            return;
        };

        let monitor = self.clone();
        runtime.spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "resource monitor started");

            run_every(&poll_ctx, interval, || {
                monitor.tick(&poll_ctx);
                std::future::ready(())
            })
            .await;

            monitor.inner.state.lock().poller.release(id);
            info!("resource monitor stopped");
        });
    }

    /// Signal the background poller to stop; safe to call at any time
    pub fn stop(&self) {
        if self.inner.state.lock().poller.stop() {
            debug!("resource monitor stop requested");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.lock().poller.is_running()
    }

    fn tick(&self, ctx: &Context) {
        let stats = match self.get_stats() {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "failed to sample process resources");
                return;
            }
        };

        if ctx.is_done() {
            return;
        }
        let thresholds = self.thresholds();

        if let Some(callback) = &self.inner.on_stats_update {
            callback(&stats);
        }

        let memory_percent = stats.memory_percent();
        if memory_percent > thresholds.memory_percent {
            warn!(
                memory_percent,
                threshold = thresholds.memory_percent,
                memory_used_mb = stats.memory_used_mb,
                "memory usage above threshold"
            );
            if let Some(callback) = &self.inner.on_high_memory {
                callback(&stats);
            }
        }

        if stats.thread_count > thresholds.thread_count {
            warn!(
                thread_count = stats.thread_count,
                threshold = thresholds.thread_count,
                "thread count above threshold"
            );
            if let Some(callback) = &self.inner.on_high_threads {
                callback(&stats);
            }
        }
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(ResourceMonitorConfig::default())
    }
}

impl fmt::Debug for ResourceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ResourceMonitor")
            .field("thresholds", &state.thresholds)
            .field("interval", &self.inner.interval)
            .field("running", &state.poller.is_running())
            .finish()
    }
}
