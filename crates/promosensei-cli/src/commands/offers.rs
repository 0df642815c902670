//! One-shot offer commands: search, summary, brand, ingest, stats.

use super::load_config;
use crate::render;
use anyhow::Context;
use promosensei_agent::{JsonFileSource, OfferSource, PromoSensei, StoreStats};
use promosensei_memory::OfferStore;
use std::path::{Path, PathBuf};

/// Build the service from configuration.
pub fn connect(config_path: Option<&Path>) -> anyhow::Result<PromoSensei> {
    let config = load_config(config_path)?;
    PromoSensei::from_config(&config).context("Failed to start Promo Sensei")
}

/// Answer a question.
pub async fn search(config_path: Option<&Path>, query: &str) -> anyhow::Result<()> {
    let sensei = connect(config_path)?;
    render::render_progress(&format!("Searching for deals related to '{}'...", query));
    render::render_markdown(&sensei.answer_query(query).await);
    Ok(())
}

/// Summarize recent offers.
pub async fn summary(config_path: Option<&Path>, count: Option<usize>) -> anyhow::Result<()> {
    let sensei = connect(config_path)?;
    let count = count.unwrap_or(sensei.settings().summary_k);
    render::render_progress("Generating a summary of top deals...");
    render::render_markdown(&sensei.summarize_recent(count).await);
    Ok(())
}

/// List a brand's offers.
pub async fn brand(config_path: Option<&Path>, name: &str) -> anyhow::Result<()> {
    let sensei = connect(config_path)?;
    render::render_progress(&format!("Listing offers for brand: '{}'...", name));
    render::render_markdown(&sensei.list_by_brand(name).await);
    Ok(())
}

/// Ingest a scraper export.
///
/// Without `force`, a store that already holds offers is left alone so the
/// same export is not stored twice.
pub async fn ingest(
    config_path: Option<&Path>,
    file: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let sensei = PromoSensei::from_config(&config).context("Failed to start Promo Sensei")?;
    let source = JsonFileSource::new(file.unwrap_or_else(|| config.source.offers_file.clone()));

    let report = if force {
        let offers = source.fetch().await?;
        Some(sensei.ingest(offers).await?)
    } else {
        sensei.seed_if_empty(&source).await?
    };

    match report {
        Some(report) => render::render_ingest_report(&report, sensei.len().await),
        None => println!(
            "Store already holds {} offers; nothing ingested. Use --force to add {} anyway.",
            sensei.len().await,
            source.path().display()
        ),
    }
    Ok(())
}

/// Show store statistics. Needs no API key.
pub async fn stats(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = OfferStore::load_or_init(config.store.path.clone())
        .with_context(|| format!("Failed to open offer store at {}", config.store.path.display()))?;
    render::render_stats(&StoreStats::from_store(&store));
    Ok(())
}
