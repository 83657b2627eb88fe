//! Core domain types, errors, and constants for `bulwark`.
//!
//! This crate establishes the foundational building blocks shared by the
//! resilience primitives in `bulwark-resilience`.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum, the comparable
//!   `ErrorKind`, and the `Result` type alias.
//! - **`context`**: `Context`, the cancellation signal and deadline that every
//!   blocking operation races against.
//! - **`settings`**: Serde-deserialisable settings with environment overrides.
//! - **`constants`**: Defaults and environment variable names.
//! - **`telemetry`**: Opt-in tracing subscriber initialisation.

pub mod constants;
pub mod context;
pub mod errors;
pub mod settings;
pub mod telemetry;

pub use self::{
    context::Context,
    errors::{Error, ErrorKind, Result, ResultExt},
};
