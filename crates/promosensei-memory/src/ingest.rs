//! Ingestion: embed offers and append them to the store.

use crate::embeddings::EmbeddingProvider;
use crate::store::OfferStore;
use crate::Result;
use promosensei_core::OfferRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records handed to the pipeline.
    pub submitted: usize,

    /// Records embedded and appended to the store.
    pub embedded: usize,

    /// Records dropped because their embedding failed.
    pub skipped: usize,
}

impl IngestReport {
    /// Whether anything was written.
    pub fn is_empty(&self) -> bool {
        self.embedded == 0
    }
}

/// Embeds offers one at a time and appends the successes to an [`OfferStore`].
#[derive(Clone)]
pub struct Ingestor {
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl Ingestor {
    /// Create an ingestor around an embedding provider.
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embeddings }
    }

    /// Ingest a batch of offers.
    ///
    /// A record whose embedding fails is left out of both the index and the
    /// metadata. Records are not deduplicated: ingesting the same batch twice
    /// stores it twice.
    pub async fn ingest(
        &self,
        store: &mut OfferStore,
        records: Vec<OfferRecord>,
    ) -> Result<IngestReport> {
        let mut report = IngestReport {
            submitted: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            warn!("No offers provided for ingestion");
            return Ok(report);
        }

        debug!(
            "Embedding {} offers with model {}",
            records.len(),
            self.embeddings.model()
        );

        let mut vectors = Vec::with_capacity(records.len());
        let mut staged = Vec::with_capacity(records.len());

        for record in records {
            match self.embeddings.embed_one(&record.embedding_text()).await {
                Ok(vector) => {
                    vectors.push(vector);
                    staged.push(record);
                }
                Err(e) => {
                    warn!(
                        "Skipping offer '{}': embedding failed: {}",
                        record.title.as_deref().unwrap_or("<untitled>"),
                        e
                    );
                    report.skipped += 1;
                }
            }
        }

        if staged.is_empty() {
            info!("No valid embeddings generated for ingestion");
            return Ok(report);
        }

        report.embedded = staged.len();
        store.add(vectors, staged)?;

        info!(
            "Ingested {} offers ({} skipped), store now holds {}",
            report.embedded,
            report.skipped,
            store.len()
        );
        Ok(report)
    }
}
