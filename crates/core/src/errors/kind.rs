//! Error kinds and classification helpers
//!
//! `ErrorKind` is the comparable identity of an [`Error`]. Retry allow-lists
//! are expressed as kinds, and [`Error::is`] looks through `Context`
//! wrappers the same way a wrapped error chain is searched.

use super::types::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminant of [`Error`], used wherever errors must be compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CircuitOpen,
    Client,
    Canceled,
    DeadlineExceeded,
    Network,
    Http,
    CommandExecution,
    Timeout,
    Configuration,
    Io,
    Json,
    Operation,
    Context,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 13] = [
        ErrorKind::CircuitOpen,
        ErrorKind::Client,
        ErrorKind::Canceled,
        ErrorKind::DeadlineExceeded,
        ErrorKind::Network,
        ErrorKind::Http,
        ErrorKind::CommandExecution,
        ErrorKind::Timeout,
        ErrorKind::Configuration,
        ErrorKind::Io,
        ErrorKind::Json,
        ErrorKind::Operation,
        ErrorKind::Context,
    ];

    /// Stable snake_case name, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::CircuitOpen => "circuit_open",
            ErrorKind::Client => "client",
            ErrorKind::Canceled => "canceled",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::Network => "network",
            ErrorKind::Http => "http",
            ErrorKind::CommandExecution => "command_execution",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Io => "io",
            ErrorKind::Json => "json",
            ErrorKind::Operation => "operation",
            ErrorKind::Context => "context",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::configuration(format!("unknown error kind '{s}'")))
    }
}

impl Error {
    /// The kind of this error, without looking through wrappers
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CircuitOpen => ErrorKind::CircuitOpen,
            Error::Client { .. } => ErrorKind::Client,
            Error::Canceled => ErrorKind::Canceled,
            Error::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            Error::Network { .. } => ErrorKind::Network,
            Error::Http { .. } => ErrorKind::Http,
            Error::CommandExecution { .. } => ErrorKind::CommandExecution,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Io { .. } => ErrorKind::Io,
            Error::Json { .. } => ErrorKind::Json,
            Error::Operation { .. } => ErrorKind::Operation,
            Error::Context { .. } => ErrorKind::Context,
        }
    }

    /// Whether this error, or any error it wraps, has the given kind
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        if self.kind() == kind {
            return true;
        }
        match self {
            Error::Context { source, .. } => source.is(kind),
            _ => false,
        }
    }

    /// Whether the error signals a caller-side mistake that retrying cannot fix
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Client { .. } => true,
            // 408 and 429 are the caller being told to come back later
            Error::Http { status, .. } => {
                (400..500).contains(status) && *status != 408 && *status != 429
            }
            Error::Context { source, .. } => source.is_client_error(),
            _ => false,
        }
    }

    /// Whether the error came from context cancellation or a deadline
    #[must_use]
    pub fn is_context_error(&self) -> bool {
        self.is(ErrorKind::Canceled) || self.is(ErrorKind::DeadlineExceeded)
    }

    /// The innermost error once all `Context` wrappers are removed
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_looks_through_context() {
        let err = Error::network("releases.example.com", "connection reset")
            .with_message("fetching latest release")
            .with_message("checking for updates");

        assert_eq!(err.kind(), ErrorKind::Context);
        assert!(err.is(ErrorKind::Network));
        assert!(err.is(ErrorKind::Context));
        assert!(!err.is(ErrorKind::Http));
        assert_eq!(err.root().kind(), ErrorKind::Network);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::client("missing token").is_client_error());
        assert!(Error::http("https://api", 404, "not found").is_client_error());
        assert!(!Error::http("https://api", 429, "slow down").is_client_error());
        assert!(!Error::http("https://api", 408, "timeout").is_client_error());
        assert!(!Error::http("https://api", 503, "unavailable").is_client_error());
        assert!(Error::client("bad")
            .with_message("wrapped")
            .is_client_error());
        assert!(!Error::operation("boom").is_client_error());
    }

    #[test]
    fn test_context_error_classification() {
        assert!(Error::Canceled.is_context_error());
        assert!(Error::DeadlineExceeded.is_context_error());
        assert!(Error::Canceled.with_message("health check").is_context_error());
        assert!(!Error::CircuitOpen.is_context_error());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("network".parse::<ErrorKind>().unwrap(), ErrorKind::Network);
        assert_eq!(
            "Deadline-Exceeded".parse::<ErrorKind>().unwrap(),
            ErrorKind::DeadlineExceeded
        );
        assert!("bogus".parse::<ErrorKind>().is_err());

        for kind in ErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_serde_matches_as_str() {
        let json = serde_json::to_string(&ErrorKind::CommandExecution).unwrap();
        assert_eq!(json, "\"command_execution\"");
    }
}
