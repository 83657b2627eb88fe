//! Error types and result extensions for bulwark operations

mod builders;
mod conversions;
mod extensions;
mod kind;
mod types;

pub use extensions::*;
pub use kind::ErrorKind;
pub use types::{Error, Result};
