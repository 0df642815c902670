//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Promo Sensei configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI API credentials and endpoint.
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Embedding service settings.
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Text-completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Vector store location.
    #[serde(default)]
    pub store: StoreConfig,

    /// Retrieval settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Where scraped offers are picked up from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI API settings shared by the embedding and completion clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key. Falls back to `OPENAI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// API base URL, including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Organization ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            organization: None,
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding model id.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after a retryable failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff between attempts, doubled each retry.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            timeout_secs: default_embedding_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Text-completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Chat model id.
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Output token budget per answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> usize {
    500
}

fn default_completion_timeout() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_completion_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base path; the index and metadata files are siblings derived from it.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/offer_index")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Nearest neighbours retrieved per search.
    #[serde(default = "default_search_k")]
    pub search_k: usize,

    /// Most recent offers included in a summary.
    #[serde(default = "default_summary_k")]
    pub summary_k: usize,
}

fn default_search_k() -> usize {
    20
}

fn default_summary_k() -> usize {
    5
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_k: default_search_k(),
            summary_k: default_summary_k(),
        }
    }
}

/// Offer source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON export written by the scraper.
    #[serde(default = "default_offers_file")]
    pub offers_file: PathBuf,
}

fn default_offers_file() -> PathBuf {
    PathBuf::from("scraped_offers.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            offers_file: default_offers_file(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
