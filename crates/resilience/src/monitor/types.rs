//! Resource snapshot and threshold types

use bulwark_core::constants::{DEFAULT_MEMORY_THRESHOLD_PERCENT, DEFAULT_THREAD_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Point-in-time resource usage of this process
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceStats {
    /// Resident set size of the process
    pub memory_used_mb: f64,
    /// Total memory of the host
    pub memory_total_mb: f64,
    /// OS threads currently owned by the process
    pub thread_count: usize,
    pub cpu_percent: f32,
}

impl ResourceStats {
    /// Process memory as a percentage of host memory
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total_mb <= 0.0 {
            return 0.0;
        }
        self.memory_used_mb / self.memory_total_mb * 100.0
    }
}

/// Limits above which the monitor raises alerts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceThresholds {
    /// Memory percentage (0-100)
    pub memory_percent: f64,
    pub thread_count: usize,
}

impl Default for ResourceThresholds {
    fn default() -> Self {
        Self {
            memory_percent: DEFAULT_MEMORY_THRESHOLD_PERCENT,
            thread_count: DEFAULT_THREAD_THRESHOLD,
        }
    }
}

/// Receives every sample, or every sample that crossed a threshold
pub type StatsCallback = Arc<dyn Fn(&ResourceStats) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_percent() {
        let stats = ResourceStats {
            memory_used_mb: 512.0,
            memory_total_mb: 2048.0,
            thread_count: 4,
            cpu_percent: 0.0,
        };
        assert_eq!(stats.memory_percent(), 25.0);
        assert_eq!(ResourceStats::default().memory_percent(), 0.0);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = ResourceThresholds::default();
        assert_eq!(thresholds.memory_percent, 80.0);
        assert_eq!(thresholds.thread_count, 1000);
    }
}
