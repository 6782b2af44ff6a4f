//! Error types for showcase-sync.

use std::path::PathBuf;

use thiserror::Error;

use showcase_api::ApiError;

/// All errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote call on the source or the target failed.
    #[error("remote API error: {0}")]
    Api(#[from] ApiError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image body stopped arriving part-way through.
    #[error("download of {url} interrupted: {source}")]
    Download {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
