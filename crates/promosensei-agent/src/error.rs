//! Agent error types.

use promosensei_memory::MemoryError;
use promosensei_providers::ProviderError;
use thiserror::Error;

/// Errors that can occur while wiring or feeding the query pipeline.
///
/// The three query entry points never return these; they fold failures into
/// their reply text.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Vector store or embedding failure.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Completion provider failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An offer source could not be read.
    #[error("Offer source error: {0}")]
    Source(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
