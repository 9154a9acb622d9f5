//! Error types for the image service adapter

use thiserror::Error;

/// Unified error type surfaced by every operation of the adapter.
///
/// All errors propagate to the caller; the adapter performs no silent
/// recovery and no internal retry.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request settings are absent or invalid at call time.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The remote service reported an error of its own.
    ///
    /// The Display output is the service's message verbatim so callers can
    /// show it to the user unchanged. `code` carries the HTTP status when the
    /// error arrived on a non-2xx response, `None` when it was embedded in a
    /// 200 body.
    #[error("{message}")]
    ApiError {
        code: Option<u16>,
        message: String,
    },

    /// Network or transport failure from the request executor.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid parameter (header name/value, malformed input).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ServiceError {
    /// Shorthand for a service-reported error with no HTTP status attached.
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiError {
            code: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::HttpError(e.to_string())
    }
}
