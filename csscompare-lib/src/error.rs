use std::path::PathBuf;
use thiserror::Error;

/// Failures of the I/O glue around the normalizer. Normalization itself is total.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Version/tag lookup failed.
    #[error("{0}")]
    Resolution(String),

    #[error("File path does not exist: {}", .0.display())]
    MissingPath(PathBuf),

    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-2xx, non-redirect response. `body` is the response text.
    #[error("Server returned {status}\n{body}")]
    Transport { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CompareError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CompareError::Io {
            context: context.into(),
            source,
        }
    }
}
