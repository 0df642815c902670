//! End-to-end tests of ingestion and querying against a real on-disk store.

use promosensei_agent::prompts;
use promosensei_core::OfferRecord;
use promosensei_integration_tests::{catalogue, Rig, REPLY};
use promosensei_memory::OfferStore;
use tempfile::TempDir;

fn titles(offers: &[OfferRecord]) -> Vec<String> {
    offers
        .iter()
        .map(|o| o.title.clone().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_search_is_stable_across_reload() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("store").join("offer_index");

    let before = {
        let rig = Rig::open(&base).unwrap();
        let report = rig.sensei.ingest(catalogue()).await.unwrap();
        assert_eq!(report.embedded, 4);
        rig.sensei.search("phone deals", 4).await.unwrap()
    };

    let rig = Rig::open(&base).unwrap();
    assert_eq!(rig.sensei.len().await, 4);
    let after = rig.sensei.search("phone deals", 4).await.unwrap();

    assert_eq!(titles(&before), titles(&after));
    assert_eq!(before[0].title.as_deref(), Some("Phone exchange bonus"));
}

#[tokio::test]
async fn test_failed_embeddings_keep_files_aligned() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("offer_index");
    let rig = Rig::open(&base).unwrap();

    let mut offers = catalogue();
    offers.insert(2, OfferRecord::new("FAIL this one").with_brand("Broken"));
    let report = rig.sensei.ingest(offers).await.unwrap();

    assert_eq!(report.submitted, 5);
    assert_eq!(report.embedded, 4);
    assert_eq!(report.skipped, 1);

    let store = OfferStore::load_or_init(&base).unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.index_len(), store.len());
    assert!(store.records().iter().all(|o| !o.brand_is("Broken")));
}

#[tokio::test]
async fn test_reingest_duplicates_offers() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();

    rig.sensei.ingest(catalogue()).await.unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();

    assert_eq!(rig.sensei.len().await, 8);
    let stats = rig.sensei.stats().await;
    assert_eq!(stats.brands.get("Nike"), Some(&2));
}

#[tokio::test]
async fn test_answer_cites_cleaned_flipkart_link() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();

    let reply = rig.sensei.answer_query("phone").await;
    assert_eq!(reply, REPLY);

    let prompt = rig.provider.last_prompt().unwrap();
    assert!(prompt.contains("Here are the relevant promotional offers:"));
    assert!(prompt.contains("[View Offer](https://www.flipkart.com/p/x?pid=1)"));
    assert!(!prompt.contains("hpid="));
    assert!(prompt.contains("User Query: phone"));
}

#[tokio::test]
async fn test_query_on_empty_store_asks_for_polite_refusal() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();

    let reply = rig.sensei.answer_query("any laptop deals?").await;
    assert_eq!(reply, REPLY);
    assert_eq!(
        rig.provider.last_prompt().unwrap(),
        prompts::no_results("any laptop deals?")
    );
    assert_eq!(rig.embeddings.calls(), 0);
}

#[tokio::test]
async fn test_completion_outage_yields_apologies() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();
    rig.provider.set_down(true);

    assert_eq!(rig.sensei.answer_query("shoe").await, prompts::QUERY_APOLOGY);
    assert_eq!(rig.sensei.summarize_recent(2).await, prompts::SUMMARY_APOLOGY);
    assert_eq!(rig.sensei.list_by_brand("nike").await, prompts::BRAND_APOLOGY);
}

#[tokio::test]
async fn test_embedding_outage_still_answers() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();
    rig.embeddings.set_down(true);

    assert_eq!(rig.sensei.answer_query("shoe").await, REPLY);
    assert_eq!(rig.provider.last_prompt().unwrap(), prompts::no_results("shoe"));
}

#[tokio::test]
async fn test_summary_of_empty_store_skips_completion() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();

    assert_eq!(rig.sensei.summarize().await, prompts::NO_DEALS);
    assert_eq!(rig.provider.calls(), 0);
}

#[tokio::test]
async fn test_summary_of_zero_uses_every_offer() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();

    assert_eq!(rig.sensei.summarize_recent(0).await, REPLY);
    let prompt = rig.provider.last_prompt().unwrap();
    for title in titles(&catalogue()) {
        assert!(prompt.contains(&title), "summary should include {}", title);
    }
}

#[tokio::test]
async fn test_summary_uses_most_recent_offers() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();

    rig.sensei.summarize_recent(2).await;
    let prompt = rig.provider.last_prompt().unwrap();
    assert!(prompt.contains("Beauty week"));
    assert!(prompt.contains("Laptop festival"));
    assert!(!prompt.contains("Running shoe sale"));
}

#[tokio::test]
async fn test_brand_lookup_ignores_case() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    rig.sensei.ingest(catalogue()).await.unwrap();

    assert_eq!(rig.sensei.list_by_brand("FLIPKART").await, REPLY);
    let prompt = rig.provider.last_prompt().unwrap();
    assert!(prompt.contains("Phone exchange bonus"));
    assert!(prompt.contains("Laptop festival"));
    assert!(!prompt.contains("Beauty week"));

    let calls = rig.provider.calls();
    assert_eq!(
        rig.sensei.list_by_brand("Adidas").await,
        prompts::brand_not_found("Adidas")
    );
    assert_eq!(rig.provider.calls(), calls);
}

#[tokio::test]
async fn test_seed_reads_scraper_export_once() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("scraped_offers.json");
    std::fs::write(
        &export,
        r#"[
            {"title": "Watch clearance", "brand_name": "Titan", "expiry_date": null, "scraped_at": "today"},
            {"title": "Phone covers", "description": "Any phone cover at 99", "brand_name": "Amazon"}
        ]"#,
    )
    .unwrap();
    let source = promosensei_agent::JsonFileSource::new(&export);

    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    let report = rig.sensei.seed_if_empty(&source).await.unwrap().unwrap();
    assert_eq!(report.embedded, 2);

    assert!(rig.sensei.seed_if_empty(&source).await.unwrap().is_none());
    assert_eq!(rig.sensei.len().await, 2);
}
