//! Core error type definitions

use std::time::Duration;

/// Result type alias for bulwark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bulwark operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The circuit breaker refused the call without running it
    #[error("circuit breaker is open")]
    CircuitOpen,

    /// Caller-side mistake; never retried
    #[error("client error: {message}")]
    Client { message: String },

    /// The context was cancelled
    #[error("context canceled")]
    Canceled,

    /// The context deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Network-related errors
    #[error("network error for '{endpoint}': {message}")]
    Network { endpoint: String, message: String },

    /// Non-success HTTP responses
    #[error("HTTP {status} from '{url}': {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// Subprocess execution errors
    #[error("command '{}' failed{}: {message}", command_line(.command, .args), exit_code_suffix(.exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Operation timeout errors
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// I/O failures
    #[error("I/O error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic failure reported by a protected operation
    #[error("{message}")]
    Operation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Another bulwark error with added context
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

fn command_line(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{command} {}", args.join(" "))
    }
}

fn exit_code_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" with exit code {code}"),
        None => String::new(),
    }
}
