//! Error types for lect-chat

use thiserror::Error;

/// Result type alias using lect-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the answering service
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Service returned a non-success status code
    #[error("service error: status {status}: {body}")]
    Api { status: u16, body: String },
}

impl Error {
    /// Create an API error from a status code and response body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Whether this error came back from the service itself rather than
    /// failing in transit.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Api { .. })
    }
}
