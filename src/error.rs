//! Error types for the migration pipeline

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the migration pipeline.
///
/// Only `TransientRemote` is retryable; `PayloadTooLarge` is absorbed at the
/// item level by the uploader. Everything else aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    /// Gallery store unreachable or query failed (wraps sqlx::Error)
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Gallery store returned a row the entity model cannot interpret
    #[error("store returned malformed data: {0}")]
    StoreMalformed(String),

    /// Album parent chain exceeded the safety depth
    #[error("album hierarchy cycle detected walking parents of album {album_id}")]
    HierarchyCycle { album_id: i64 },

    /// Server-side transient failure (HTTP 5xx), eligible for retry
    #[error("transient remote error (status {status}): {message}")]
    TransientRemote { status: u16, message: String },

    /// Remote rejected the media body as too large (HTTP 413)
    #[error("remote rejected payload as too large")]
    PayloadTooLarge,

    /// Non-retryable remote failure (auth, validation, any other 4xx)
    #[error("permanent remote error (status {status}): {message}")]
    PermanentRemote { status: u16, message: String },

    /// Retry budget exhausted; wraps the last transient error
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// Transport-level failure talking to the remote service
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local I/O error (reading media files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors the backoff policy may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::TransientRemote { .. })
    }
}
