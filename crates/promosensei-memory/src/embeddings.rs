//! Embedding generation providers.

use crate::error::MemoryError;
use crate::Result;
use async_trait::async_trait;
use promosensei_core::config::{EmbeddingsConfig, OpenAIConfig};
use promosensei_core::SecretString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Generate embeddings for texts, one vector per input in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }
}

/// Collapse line breaks into spaces before submission.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// OpenAI embeddings provider.
pub struct OpenAIEmbeddings {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    organization: Option<String>,
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAIEmbeddings {
    /// Create a new OpenAI embeddings provider.
    pub fn new(api_key: SecretString) -> Result<Self> {
        Self::build(api_key, 30)
    }

    /// Create a provider from the shared OpenAI and embedding config sections.
    pub fn from_config(api_key: SecretString, openai: &OpenAIConfig, cfg: &EmbeddingsConfig) -> Result<Self> {
        let mut provider = Self::build(api_key, cfg.timeout_secs)?
            .with_model(cfg.model.clone())
            .with_base_url(openai.base_url.clone())
            .with_retries(cfg.max_retries, Duration::from_millis(cfg.retry_backoff_ms));
        provider.organization = openai.organization.clone();
        Ok(provider)
    }

    fn build(api_key: SecretString, timeout_secs: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(MemoryError::Config("API key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MemoryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: "text-embedding-3-small".to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            organization: None,
            timeout_secs,
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        })
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the retry budget and the initial backoff.
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            #[serde(default)]
            index: Option<usize>,
            embedding: Vec<f32>,
        }

        let mut request = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&Request {
                model: &self.model,
                input,
            });
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MemoryError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let response: Response = response.json().await.map_err(|e| self.map_transport(e))?;
        let mut data = response.data;
        if data.iter().all(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index);
        }

        if data.len() != input.len() {
            return Err(MemoryError::Embedding(format!(
                "Expected {} embeddings, got {}",
                input.len(),
                data.len()
            )));
        }
        if data.iter().any(|d| d.embedding.is_empty()) {
            return Err(MemoryError::Embedding("Empty embedding returned".to_string()));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn map_transport(&self, err: reqwest::Error) -> MemoryError {
        if err.is_timeout() {
            MemoryError::Timeout(self.timeout_secs)
        } else {
            MemoryError::Http(err)
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let input: Vec<String> = texts.iter().map(|t| normalize_text(t)).collect();
        debug!("Requesting {} embeddings: model={}", input.len(), self.model);

        let mut attempt = 0u32;
        loop {
            match self.request(&input).await {
                Ok(vectors) => return Ok(vectors),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.retry_backoff * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(
                        "Embedding request failed ({}), retry {}/{} in {:?}",
                        e, attempt, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
