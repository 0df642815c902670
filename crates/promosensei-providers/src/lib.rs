//! Chat completion providers for Promo Sensei.
//!
//! The query pipeline treats the language model as an opaque text
//! completion service behind the [`Provider`] trait. This crate ships an
//! OpenAI-compatible implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use promosensei_providers::{ChatOptions, Message, OpenAIProvider, Provider};
//!
//! let provider = OpenAIProvider::new("sk-...")?;
//! let response = provider
//!     .chat(
//!         "gpt-4o-mini",
//!         &[Message::user("Any flat 50% off deals today?")],
//!         Some(ChatOptions::with_max_tokens(500)),
//!     )
//!     .await?;
//! println!("{}", response.content);
//! ```

mod error;
mod types;

pub mod openai;

pub use error::{ProviderError, Result};
pub use openai::OpenAIProvider;
pub use types::*;

use async_trait::async_trait;

/// A text-completion service.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Complete `messages` with `model`.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;
}
