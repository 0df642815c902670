//! Query pipeline and chat commands for Promo Sensei.
//!
//! This crate provides:
//! - [`PromoSensei`], the service object that owns the embedding client, the
//!   completion provider, and the offer store
//! - Context formatting and prompt construction for the completion service
//! - Offer sources that feed the ingestion pipeline
//! - Parsing and dispatch of chat commands

pub mod command;
pub mod error;
pub mod format;
pub mod prompts;
pub mod sensei;
pub mod source;

pub use command::Command;
pub use error::AgentError;
pub use format::{clean_flipkart_url, format_offers};
pub use sensei::{PromoSensei, SenseiSettings, StoreStats};
pub use source::{JsonFileSource, OfferSource, StaticSource};

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
