//! Error types for forksync-update.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("update cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("version lookup failed: {0}")]
    Lookup(String),

    #[error("registry response for '{package}' has no version")]
    MissingVersion { package: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> UpdateError {
    UpdateError::Io {
        path: path.into(),
        source,
    }
}
