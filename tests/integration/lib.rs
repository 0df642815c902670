//! Deterministic stand-ins for the embedding and completion services.

use async_trait::async_trait;
use promosensei_agent::PromoSensei;
use promosensei_core::OfferRecord;
use promosensei_memory::{EmbeddingProvider, MemoryError, OfferStore};
use promosensei_providers::{
    ChatOptions, ChatResponse, Message, Provider, ProviderError, StopReason, Usage,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Words the fake embedding counts, one dimension each.
pub const VOCAB: &[&str] = &["shoe", "phone", "beauty", "laptop", "watch"];

/// Embeds text as keyword counts over [`VOCAB`].
///
/// Any text containing `FAIL` is rejected, and `set_down` fails everything.
#[derive(Default)]
pub struct KeywordEmbeddings {
    calls: AtomicUsize,
    down: AtomicBool,
}

impl KeywordEmbeddings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    fn model(&self) -> &str {
        "keywords"
    }

    async fn embed(&self, texts: &[String]) -> promosensei_memory::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(MemoryError::Embedding("service down".to_string()));
        }
        texts
            .iter()
            .map(|t| {
                if t.contains("FAIL") {
                    return Err(MemoryError::Embedding(format!("rejected: {}", t)));
                }
                let lower = t.to_lowercase();
                Ok(VOCAB
                    .iter()
                    .map(|w| lower.matches(w).count() as f32)
                    .collect())
            })
            .collect()
    }
}

/// Records every chat request and answers with a fixed reply.
#[derive(Default)]
pub struct ScriptedProvider {
    requests: Mutex<Vec<Vec<Message>>>,
    down: AtomicBool,
}

/// What [`ScriptedProvider`] answers.
pub const REPLY: &str = "Here you go.";

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// The user message of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        let requests = self.requests.lock().ok()?;
        let last = requests.last()?;
        last.last().map(|m| m.text().to_string())
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        _options: Option<ChatOptions>,
    ) -> promosensei_providers::Result<ChatResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        if self.down.load(Ordering::SeqCst) {
            return Err(ProviderError::server_error(503, "unavailable"));
        }
        Ok(ChatResponse {
            id: "scripted".to_string(),
            model: model.to_string(),
            content: format!("{}\n", REPLY),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

/// A service over the store at `base` plus handles to its fakes.
pub struct Rig {
    pub sensei: PromoSensei,
    pub embeddings: Arc<KeywordEmbeddings>,
    pub provider: Arc<ScriptedProvider>,
}

impl Rig {
    pub fn open(base: &Path) -> promosensei_memory::Result<Self> {
        let store = OfferStore::load_or_init(base)?;
        let embeddings = KeywordEmbeddings::new();
        let provider = ScriptedProvider::new();
        let sensei = PromoSensei::new(embeddings.clone(), provider.clone(), store);
        Ok(Self {
            sensei,
            embeddings,
            provider,
        })
    }
}

/// A small catalogue spanning a few brands.
pub fn catalogue() -> Vec<OfferRecord> {
    vec![
        OfferRecord::new("Running shoe sale")
            .with_description("Flat 40% off running shoe range")
            .with_brand("Nike")
            .with_category("Footwear")
            .with_expiry("2099-12-31")
            .with_link("https://www.nike.com/in/sale"),
        OfferRecord::new("Phone exchange bonus")
            .with_description("Extra 5000 off on phone exchange")
            .with_brand("Flipkart")
            .with_category("Mobiles")
            .with_link("https://www.flipkart.com/p/x?pid=1&param=9&hpid=abc&ctx=zzz"),
        OfferRecord::new("Beauty week")
            .with_description("Buy 2 get 1 on beauty products")
            .with_brand("Nykaa")
            .with_category("Beauty"),
        OfferRecord::new("Laptop festival")
            .with_description("No-cost EMI on every laptop")
            .with_brand("flipkart")
            .with_category("Computers")
            .with_expiry("2020-01-01"),
    ]
}
