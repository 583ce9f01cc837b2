//! Error kinds for pkgdep operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report a failure; the HTTP
/// layer turns every kind into a 500 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration
    ConfigInvalid,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Load errors
    // =========================================================================
    /// The loader could not resolve the root unit, or the root carries errors
    LoadFailed,

    /// The loader returned no units at all
    EmptyResult,

    // =========================================================================
    // Output errors
    // =========================================================================
    /// The graph model could not be encoded as a description
    SerializationFailed,

    /// The external renderer failed or produced nothing
    RenderFailed,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Both `LoadFailed` and `EmptyResult` mean the root unit could not be loaded.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ErrorKind::LoadFailed | ErrorKind::EmptyResult)
    }
}
