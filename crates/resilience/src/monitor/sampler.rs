//! Process resource sampling backed by `sysinfo`.

use super::types::ResourceStats;
use bulwark_core::{Error, Result};
use parking_lot::Mutex;
use sysinfo::{Pid, System};
use tokio::runtime::{Handle, RuntimeFlavor};
#[cfg(target_os = "linux")]
use tracing::debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Reads memory, CPU and thread usage of the current process
pub(crate) struct Sampler {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl Sampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn sample(&self) -> Result<ResourceStats> {
        let pid = self
            .pid
            .ok_or_else(|| Error::operation("unable to determine current process id"))?;

        let (memory_used, memory_total, cpu_percent) = {
            let mut system = self.system.lock();
            system.refresh_memory();
            if !system.refresh_process(pid) {
                return Err(Error::operation(format!("process {pid} not found")));
            }
            let process = system
                .process(pid)
                .ok_or_else(|| Error::operation(format!("process {pid} not found")))?;
            (process.memory(), system.total_memory(), process.cpu_usage())
        };

        Ok(ResourceStats {
            memory_used_mb: memory_used as f64 / BYTES_PER_MB,
            memory_total_mb: memory_total as f64 / BYTES_PER_MB,
            thread_count: thread_count()?,
            cpu_percent,
        })
    }
}

/// Number of OS threads in this process
///
/// Falls back to the runtime's threads when `/proc` is not mounted.
#[cfg(target_os = "linux")]
fn thread_count() -> Result<usize> {
    match std::fs::read_dir("/proc/self/task") {
        Ok(tasks) => Ok(tasks.filter_map(|entry| entry.ok()).count()),
        Err(e) => {
            debug!(error = %e, "cannot list /proc/self/task, counting runtime threads");
            runtime_thread_count()
        }
    }
}

/// Number of threads driving the current Tokio runtime
#[cfg(not(target_os = "linux"))]
fn thread_count() -> Result<usize> {
    runtime_thread_count()
}

/// Worker threads of the current runtime, plus the thread blocked on a
/// multi-threaded runtime
fn runtime_thread_count() -> Result<usize> {
    let handle = Handle::try_current()
        .map_err(|_| Error::operation("thread count unavailable outside a Tokio runtime"))?;
    let workers = handle.metrics().num_workers();

    Ok(match handle.runtime_flavor() {
        RuntimeFlavor::CurrentThread => workers,
        _ => workers + 1,
    })
}
