//! The Promo Sensei service: retrieval, prompting, and completion.

use crate::error::AgentError;
use crate::format::format_offers;
use crate::prompts;
use crate::source::OfferSource;
use crate::Result;
use chrono::Utc;
use promosensei_core::{Config, OfferRecord};
use promosensei_memory::{EmbeddingProvider, IngestReport, Ingestor, OfferStore, OpenAIEmbeddings};
use promosensei_providers::{ChatOptions, Message, OpenAIProvider, Provider};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Settings for the query pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SenseiSettings {
    /// Completion model id.
    pub model: String,

    /// Output budget per completion.
    pub max_tokens: usize,

    /// Offers retrieved per query.
    pub search_k: usize,

    /// Offers included in a summary.
    pub summary_k: usize,

    /// System message sent with every request.
    pub system_prompt: String,
}

impl Default for SenseiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            search_k: 20,
            summary_k: 5,
            system_prompt: prompts::SYSTEM_PROMPT.to_string(),
        }
    }
}

impl SenseiSettings {
    /// Settings from the completion and query config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.completion.model.clone(),
            max_tokens: config.completion.max_tokens,
            search_k: config.query.search_k,
            summary_k: config.query.summary_k,
            ..Default::default()
        }
    }
}

/// A snapshot of what the store holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    /// Number of offers.
    pub offers: usize,

    /// Embedding dimension, once known.
    pub dimension: Option<usize>,

    /// Offers per brand, keyed by the brand as stored.
    pub brands: BTreeMap<String, usize>,

    /// Offers whose expiry date has passed.
    pub expired: usize,

    /// Index file location.
    pub index_path: PathBuf,

    /// Metadata file location.
    pub metadata_path: PathBuf,
}

impl StoreStats {
    /// Collect counts from an opened store.
    pub fn from_store(store: &OfferStore) -> Self {
        let now = Utc::now();

        let mut brands = BTreeMap::new();
        let mut expired = 0;
        for offer in store.records() {
            let brand = offer
                .brand_name
                .clone()
                .unwrap_or_else(|| "(unknown)".to_string());
            *brands.entry(brand).or_insert(0) += 1;
            if offer.is_expired_at(now) {
                expired += 1;
            }
        }

        Self {
            offers: store.len(),
            dimension: store.dimension(),
            brands,
            expired,
            index_path: store.index_path(),
            metadata_path: store.metadata_path(),
        }
    }
}

/// Answers questions about promotional offers.
///
/// Searches may run concurrently; ingestion takes the store exclusively.
pub struct PromoSensei {
    embeddings: Arc<dyn EmbeddingProvider>,
    provider: Arc<dyn Provider>,
    ingestor: Ingestor,
    store: RwLock<OfferStore>,
    settings: SenseiSettings,
}

impl PromoSensei {
    /// Create a service over an opened store.
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        provider: Arc<dyn Provider>,
        store: OfferStore,
    ) -> Self {
        Self {
            ingestor: Ingestor::new(embeddings.clone()),
            embeddings,
            provider,
            store: RwLock::new(store),
            settings: SenseiSettings::default(),
        }
    }

    /// Build the OpenAI-backed service described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key().cloned().ok_or_else(|| {
            AgentError::Config(
                "No OpenAI API key configured. Set OPENAI_API_KEY or openai.api_key".to_string(),
            )
        })?;

        let embeddings =
            OpenAIEmbeddings::from_config(api_key.clone(), &config.openai, &config.embeddings)?;
        let provider = OpenAIProvider::from_config(api_key, &config.openai, &config.completion)?;
        let store = OfferStore::load_or_init(config.store.path.clone())?;

        Ok(Self::new(Arc::new(embeddings), Arc::new(provider), store)
            .with_settings(SenseiSettings::from_config(config)))
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: SenseiSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &SenseiSettings {
        &self.settings
    }

    /// Answer a free-text question from the most similar offers.
    pub async fn answer_query(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return prompts::SEARCH_USAGE.to_string();
        }

        let offers = match self.search(query, self.settings.search_k).await {
            Ok(offers) => offers,
            Err(e) => {
                warn!("Retrieval failed for query '{}': {}", query, e);
                Vec::new()
            }
        };
        info!("Retrieved {} offers for query: '{}'", offers.len(), query);

        let prompt = if offers.is_empty() {
            prompts::no_results(query)
        } else {
            prompts::answer(query, &format_offers(&offers))
        };

        match self.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error querying completion service: {}", e);
                prompts::QUERY_APOLOGY.to_string()
            }
        }
    }

    /// Summarize the `k` most recently ingested offers.
    ///
    /// `k == 0` summarizes every stored offer.
    pub async fn summarize_recent(&self, k: usize) -> String {
        let offers = {
            let store = self.store.read().await;
            if store.is_empty() {
                return prompts::NO_DEALS.to_string();
            }
            let k = if k == 0 { store.len() } else { k };
            info!("Summarizing the {} most recent deals", k);
            store.recent(k).to_vec()
        };

        match self.complete(prompts::summary(&format_offers(&offers))).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error summarizing deals: {}", e);
                prompts::SUMMARY_APOLOGY.to_string()
            }
        }
    }

    /// Summarize using the configured summary size.
    pub async fn summarize(&self) -> String {
        self.summarize_recent(self.settings.summary_k).await
    }

    /// Present every offer whose brand equals `brand`, ignoring case.
    pub async fn list_by_brand(&self, brand: &str) -> String {
        let brand = brand.trim();
        if brand.is_empty() {
            return prompts::BRAND_USAGE.to_string();
        }
        info!("Listing offers for brand: {}", brand);

        let matches: Vec<OfferRecord> = {
            let store = self.store.read().await;
            if store.is_empty() {
                return prompts::no_offers_in_store(brand);
            }
            store
                .records()
                .iter()
                .filter(|offer| offer.brand_is(brand))
                .cloned()
                .collect()
        };

        if matches.is_empty() {
            return prompts::brand_not_found(brand);
        }

        match self
            .complete(prompts::brand(brand, &format_offers(&matches)))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Error listing offers by brand: {}", e);
                prompts::BRAND_APOLOGY.to_string()
            }
        }
    }

    /// The `k` offers closest to `query`, nearest first.
    ///
    /// An empty store answers without calling the embedding service.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<OfferRecord>> {
        if self.store.read().await.is_empty() {
            debug!("Offer store is empty; skipping query embedding");
            return Ok(Vec::new());
        }
        let vector = self.embeddings.embed_one(query).await?;
        let store = self.store.read().await;
        Ok(store.search(&vector, k)?)
    }

    /// Embed and store a batch of offers.
    pub async fn ingest(&self, offers: Vec<OfferRecord>) -> Result<IngestReport> {
        let mut store = self.store.write().await;
        Ok(self.ingestor.ingest(&mut store, offers).await?)
    }

    /// Fetch from `source` and ingest whatever it returns.
    ///
    /// Never fails; the outcome is reported as reply text.
    pub async fn refresh(&self, source: &dyn OfferSource) -> String {
        info!("Refreshing offers from {}", source.name());

        let offers = match source.fetch().await {
            Ok(offers) => offers,
            Err(e) => {
                error!("Error during refresh: {:#}", e);
                return prompts::REFRESH_FAILED.to_string();
            }
        };
        if offers.is_empty() {
            warn!("Refresh from {} returned no offers", source.name());
            return prompts::REFRESH_EMPTY.to_string();
        }

        match self.ingest(offers).await {
            Ok(report) => prompts::refreshed(report.embedded),
            Err(e) => {
                error!("Error during refresh: {}", e);
                prompts::REFRESH_FAILED.to_string()
            }
        }
    }

    /// Ingest from `source` only if the store holds nothing yet.
    ///
    /// Returns `None` when the store already had data.
    pub async fn seed_if_empty(&self, source: &dyn OfferSource) -> Result<Option<IngestReport>> {
        let mut store = self.store.write().await;
        if !store.is_empty() {
            info!("Store already holds {} offers; skipping initial ingest", store.len());
            return Ok(None);
        }

        info!("Store is empty, ingesting initial offers from {}", source.name());
        let offers = source
            .fetch()
            .await
            .map_err(|e| AgentError::Source(format!("{:#}", e)))?;
        if offers.is_empty() {
            warn!("No offers available from {}; starting with an empty store", source.name());
        }

        let report = self.ingestor.ingest(&mut store, offers).await?;
        Ok(Some(report))
    }

    /// Summary counts over the store.
    pub async fn stats(&self) -> StoreStats {
        StoreStats::from_store(&*self.store.read().await)
    }

    /// Number of stored offers.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Check whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    async fn complete(&self, prompt: String) -> promosensei_providers::Result<String> {
        let messages = [
            Message::system(self.settings.system_prompt.clone()),
            Message::user(prompt),
        ];
        debug!(
            "Requesting completion from {}: model={}",
            self.provider.name(),
            self.settings.model
        );

        let response = self
            .provider
            .chat(
                &self.settings.model,
                &messages,
                Some(ChatOptions::with_max_tokens(self.settings.max_tokens)),
            )
            .await?;
        Ok(response.content.trim().to_string())
    }
}
