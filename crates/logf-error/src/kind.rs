//! Error kinds for logf operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// A level name did not match any known severity
    InvalidLevel,

    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration parsed but holds an unusable value
    ConfigInvalid,

    /// Configuration file does not exist
    ConfigNotFound,

    /// Reading configuration failed
    IoFailed,

    /// Configuration could not be deserialized
    DeserializationFailed,

    // =========================================================================
    // Encoding errors
    // =========================================================================
    /// A nested array or object refused to encode itself
    EncodeFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
