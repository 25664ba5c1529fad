//! Error types for squeeze-cli

use squeeze_gitlab::StatusCode;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from squeeze-core
    #[error(transparent)]
    Core(#[from] squeeze_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interrupted by Ctrl-C before the workflow finished
    #[error("interrupted")]
    Interrupted,

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Convert a workflow error, turning rejected credentials into a hint.
    pub fn from_workflow(err: squeeze_core::Error) -> Self {
        let status = match &err {
            squeeze_core::Error::Hosting(hosting) => hosting.status(),
            _ => None,
        };
        match status {
            Some(StatusCode::UNAUTHORIZED) => Self::user(
                "GitLab rejected the token (401 Unauthorized); check --token or GITLAB_TOKEN",
            ),
            Some(StatusCode::FORBIDDEN) => Self::user(
                "GitLab denied access (403 Forbidden); the token needs the `api` scope",
            ),
            _ => Self::Core(err),
        }
    }
}
