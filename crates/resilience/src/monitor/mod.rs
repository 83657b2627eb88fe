//! Process resource monitoring
//!
//! [`ResourceMonitor`] samples the resident memory, CPU usage and OS thread
//! count of the current process. In the background it reports every sample
//! through `on_stats_update` and raises `on_high_memory` / `on_high_threads`
//! whenever a sample exceeds the configured [`ResourceThresholds`].

mod config;
mod resource_monitor;
mod sampler;
mod types;

pub use config::ResourceMonitorConfig;
pub use resource_monitor::ResourceMonitor;
pub use types::{ResourceStats, ResourceThresholds, StatsCallback};
