//! Error types for squeeze-core

use std::path::PathBuf;

/// Result type for squeeze-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in a squeeze workflow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More than one remote project carries the derived name
    #[error("found {count} projects named '{name}', please specify the full path")]
    AmbiguousProject { name: String, count: usize },

    /// The push strategy found nothing to commit
    #[error("no files found in the repository to commit")]
    NoFiles,

    /// No project name can be derived from the repository path
    #[error("cannot derive a project name from {path}")]
    InvalidRepoPath { path: PathBuf },

    /// An archive entry would land outside the repository
    #[error("archive entry escapes the repository: {name}")]
    UnsafeArchiveEntry { name: String },

    /// Settings file could not be parsed
    #[error("failed to parse settings at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Filesystem failure while collecting or extracting files
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed zip archive
    #[error("invalid repository archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    // Transparent wrappers for gateway errors
    /// Hosting API error from squeeze-gitlab
    #[error(transparent)]
    Hosting(#[from] squeeze_gitlab::Error),

    /// Local git error from squeeze-git
    #[error(transparent)]
    Git(#[from] squeeze_git::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
