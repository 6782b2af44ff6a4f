//! Error types for showcase-api.

use thiserror::Error;

/// All errors that can arise from talking to a remote instance.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The action reported a "Not Found Error" (e.g. unknown showcase id).
    #[error("{action}: not found: {message}")]
    NotFound { action: String, message: String },

    /// The action ran but failed (validation, authorization, server error).
    #[error("{action} failed with HTTP {status} ({kind}): {message}")]
    Action {
        action: String,
        status: u16,
        kind: String,
        message: String,
    },

    /// Connection, DNS, TLS or timeout failure; nothing came back.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// A response arrived but could not be decoded.
    #[error("{action}: malformed response: {source}")]
    Decode {
        action: String,
        #[source]
        source: std::io::Error,
    },

    /// `success: true` without a `result` where one was required.
    #[error("{action}: response carried no result")]
    MissingResult { action: String },

    /// Reading the image file to upload failed.
    #[error("cannot read upload {file_name}: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// An image URL answered with a non-success status.
    #[error("download of {url} failed with HTTP {status}")]
    Download { url: String, status: u16 },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
