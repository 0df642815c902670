//! Vector memory for Promo Sensei.
//!
//! This crate provides:
//! - Embedding generation via an OpenAI-compatible API
//! - A flat (exhaustive) Euclidean vector index
//! - The offer store: the index plus its parallel metadata, persisted as two files
//! - The ingestion pipeline that embeds offers and appends them to the store

pub mod embeddings;
pub mod error;
pub mod index;
pub mod ingest;
pub mod store;

pub use embeddings::{normalize_text, EmbeddingProvider, OpenAIEmbeddings};
pub use error::MemoryError;
pub use index::{squared_l2, FlatIndex};
pub use ingest::{IngestReport, Ingestor};
pub use store::{OfferStore, SearchHit};

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
