use thiserror::Error;

/// Failures of an optional linguistic backend.
///
/// These never reach the caller of the engine; they are turned into a
/// fallback and a feedback note.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend has no configuration to connect with.
    #[error("{backend} backend not configured: {reason}")]
    NotConfigured {
        backend: &'static str,
        reason: String,
    },

    /// Backend switched off by the caller.
    #[error("{backend} backend disabled")]
    Disabled { backend: &'static str },

    /// HTTP transport failure (connection, timeout, decoding).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("{backend} returned {status}: {body}")]
    Status {
        backend: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Service answered with something we cannot use.
    #[error("malformed {backend} response: {message}")]
    InvalidResponse {
        backend: &'static str,
        message: String,
    },

    /// Local analyzer failure.
    #[error("{backend} analysis failed: {message}")]
    Analysis {
        backend: &'static str,
        message: String,
    },
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
