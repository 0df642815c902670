//! Memory error types.

use thiserror::Error;

/// Errors that can occur during memory operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The embedding service answered with a non-success status.
    #[error("Embedding API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The embedding request did not finish in time.
    #[error("Embedding request timed out after {0} seconds")]
    Timeout(u64),

    /// Embedding generation failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A vector does not match the index dimension.
    #[error("Dimension mismatch: index has {expected}, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vectors and records passed to the store differ in count.
    #[error("Length mismatch: {vectors} vectors for {records} records")]
    LengthMismatch { vectors: usize, records: usize },

    /// Persisted index and metadata disagree.
    #[error("Store corrupted: index holds {index_len} vectors but metadata holds {metadata_len} records")]
    Corrupted { index_len: usize, metadata_len: usize },

    /// The index file could not be decoded.
    #[error("Invalid index file: {0}")]
    InvalidIndex(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    /// Whether retrying the same embedding request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
