//! Core error types for the wyndo crates.
//!
//! Field validation failures are *not* errors: rules report them as plain
//! values. [`WyndoError`] covers misuse of the engine (unknown or duplicate
//! fields), configuration problems and transport failures.

use thiserror::Error;

/// The primary error type for the wyndo crates.
#[derive(Error, Debug)]
pub enum WyndoError {
    // ── Form engine ──────────────────────────────────────────────────

    /// An update or query named a field that was never registered.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A field name was registered twice on the same engine.
    #[error("Field already registered: {0}")]
    DuplicateField(String),

    /// A field declared a dependency on a field that does not exist.
    #[error("Field '{field}' depends on unknown field '{depends_on}'")]
    UnknownDependency {
        /// The field carrying the dependency.
        field: String,
        /// The missing field it points at.
        depends_on: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Network ──────────────────────────────────────────────────────

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a status the caller did not expect.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WyndoError {
    /// Returns `true` for errors caused by how the form engine was driven,
    /// as opposed to environment or network failures.
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownField(_) | Self::DuplicateField(_) | Self::UnknownDependency { .. }
        )
    }
}

impl From<serde_json::Error> for WyndoError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, WyndoError>`.
pub type WyndoResult<T> = Result<T, WyndoError>;
