//! # pkgdep-error
//!
//! Unified error handling for pkgdep.
//!
//! - **ErrorKind**: what went wrong (e.g. `LoadFailed`, `RenderFailed`)
//! - **Operation**: where it went wrong, chained as the error travels up
//! - **Context**: key/value pairs that help locate the cause
//! - **Source**: the wrapped underlying error, if any
//!
//! ```rust
//! use pkgdep_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::LoadFailed, "no Go files in directory")
//!         .with_operation("loader::go_list")
//!         .with_context("pattern", "./cmd/stringer"))
//! }
//! ```
//!
//! Every failure is terminal for the request that produced it: there is no
//! retry classification.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the pkgdep Error
pub type Result<T> = std::result::Result<T, Error>;
