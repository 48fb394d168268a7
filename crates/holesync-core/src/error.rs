//! Error types for the holesync system
//!
//! This module defines all error types used throughout the workspace.
//! Several variants carry stable message prefixes ("failed to unmarshal error
//! response", "max tries reached for token renewal") that callers match on to
//! tell protocol corruption apart from legitimate backend errors.

use thiserror::Error;

/// Result type alias for holesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the holesync system
#[derive(Error, Debug)]
pub enum Error {
    /// The provider was built without a backend address
    #[error("no server configured")]
    NoServer,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login failed or the session could not be established
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure (DNS, connect, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The session expired and could not be recovered with a single renewal
    #[error("max tries reached for token renewal: {0}")]
    TokenRenewal(String),

    /// A response body could not be decoded
    #[error("failed to unmarshal error response: {0}")]
    Unmarshal(String),

    /// The backend answered with a status code that is neither 2xx nor 401
    #[error("received {status} status code from request: [{key}] {message}{}", hint_suffix(.hint))]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Backend error key
        key: String,
        /// Backend error message
        message: String,
        /// Backend hint, when the backend sent a non-empty one
        hint: Option<String>,
    },

    /// Record kind this backend cannot list
    #[error("unsupported record type: {0}")]
    UnsupportedRecordType(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a token renewal error
    pub fn token_renewal(msg: impl Into<String>) -> Self {
        Self::TokenRenewal(msg.into())
    }

    /// Create a decoding error
    pub fn unmarshal(msg: impl Into<String>) -> Self {
        Self::Unmarshal(msg.into())
    }

    /// Create an unsupported record type error
    pub fn unsupported_record_type(kind: impl Into<String>) -> Self {
        Self::UnsupportedRecordType(kind.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error was raised before any request reached the backend
    ///
    /// Validation and configuration failures are deterministic: replaying the
    /// same call yields the same error.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoServer | Self::Config(_) | Self::InvalidInput(_) | Self::UnsupportedRecordType(_)
        )
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) if !hint.is_empty() => format!(" ({})", hint),
        _ => String::new(),
    }
}
