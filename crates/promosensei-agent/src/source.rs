//! Where offers come from.
//!
//! Scrapers run outside this process and export what they find as a JSON
//! array of offer records. [`OfferSource`] is the seam the refresh and
//! seeding paths read through.

use anyhow::Context;
use async_trait::async_trait;
use promosensei_core::OfferRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A supplier of freshly scraped offers.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Human-readable name, for logging.
    fn name(&self) -> &str;

    /// Fetch the current batch of offers.
    async fn fetch(&self) -> anyhow::Result<Vec<OfferRecord>>;
}

/// Reads a scraper export: a JSON array of offer records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    /// Read offers from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OfferSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> anyhow::Result<Vec<OfferRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read offers from {}", self.path.display()))?;

        let offers: Vec<OfferRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse offers in {}", self.path.display()))?;

        debug!("Read {} offers from {}", offers.len(), self.path.display());
        Ok(offers)
    }
}

/// A fixed, in-memory batch of offers.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    offers: Vec<OfferRecord>,
}

impl StaticSource {
    /// Serve `offers` on every fetch.
    pub fn new(offers: Vec<OfferRecord>) -> Self {
        Self { offers }
    }
}

#[async_trait]
impl OfferSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> anyhow::Result<Vec<OfferRecord>> {
        Ok(self.offers.clone())
    }
}
