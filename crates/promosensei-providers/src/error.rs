//! Errors from the completion service.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Why a completion request produced no answer.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Model not available: {0}")]
    ModelNotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request rejected: {0}")]
    InvalidRequest(String),

    #[error("Completion service error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Completion timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed completion payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The service answered without any completion text.
    #[error("Empty completion: {0}")]
    EmptyResponse(String),

    #[error("Provider misconfigured: {0}")]
    Config(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status returned for a request to `model`.
    pub fn from_status(status: u16, model: &str, message: String) -> Self {
        match status {
            401 | 403 => Self::Authentication(message),
            404 => Self::ModelNotFound(model.to_string()),
            429 => Self::RateLimited(message),
            400..=499 => Self::InvalidRequest(message),
            _ => Self::server_error(status, message),
        }
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyResponse(message.into())
    }

    /// Whether the same request could succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Timeout(_) | Self::Network(_) => true,
            Self::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
