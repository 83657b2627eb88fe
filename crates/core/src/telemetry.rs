//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; binaries and tests that want to
//! see them call [`init`] once at startup.

use crate::constants::{BULWARK_LOG_VAR, DEFAULT_LOG_FILTER};
use crate::errors::{Error, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing system
///
/// The filter comes from `RUST_LOG`, then `BULWARK_LOG`, then `info`.
/// Output is a compact formatter on stderr, with ANSI colours only when
/// stderr is a terminal. Calling this twice returns a configuration error.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter()))
        .map_err(|e| Error::configuration(format!("invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::configuration(format!("failed to install tracing subscriber: {e}")))
}

fn default_filter() -> String {
    std::env::var(BULWARK_LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
