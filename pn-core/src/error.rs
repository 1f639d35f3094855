//! Global error types for the PostNL SDK.
//!
//! All error categories across the SDK are unified into a single
//! `PnError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using PnError.
pub type PnResult<T> = Result<T, PnError>;

/// Unified error type covering all error categories in the SDK.
#[derive(Error, Debug)]
pub enum PnError {
    // -- Validation errors --
    /// An argument failed validation (wrong shape, missing required field).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Configuration errors --
    /// Failed to load or parse SDK configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors --
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(String),

    /// Could not establish a connection to the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Server returned an error response.
    #[error("server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PnError {
    /// Whether a failed request may succeed on a later attempt.
    ///
    /// Timeouts and connection failures are transient; everything else
    /// (validation, auth, server-side rejections) is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PnError::Timeout(_) | PnError::Connection(_))
    }
}

impl From<serde_json::Error> for PnError {
    fn from(e: serde_json::Error) -> Self {
        PnError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for PnError {
    fn from(e: toml::de::Error) -> Self {
        PnError::Config(e.to_string())
    }
}
