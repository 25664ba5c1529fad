//! Error types for squeeze-gitlab

use reqwest::StatusCode;

/// Result type for squeeze-gitlab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the hosting API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an unexpected status
    #[error("gitlab api returned {status} for {operation}, body: {body}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status carried by a [`Error::Status`] error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
