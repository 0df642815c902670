//! Chat command dispatch against a live service.

use promosensei_agent::command::HELP;
use promosensei_agent::{prompts, Command, JsonFileSource, StaticSource};
use promosensei_integration_tests::{catalogue, Rig, REPLY};
use tempfile::TempDir;

#[tokio::test]
async fn test_help_usage_and_exit() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    let source = StaticSource::default();

    let help = Command::parse("help").execute(&rig.sensei, &source).await;
    assert_eq!(help.as_deref(), Some(HELP));

    let usage = Command::parse("search").execute(&rig.sensei, &source).await;
    assert_eq!(usage.as_deref(), Some(prompts::SEARCH_USAGE));

    let unknown = Command::parse("deals pls").execute(&rig.sensei, &source).await;
    assert!(unknown.unwrap().starts_with("I didn't understand that command."));

    assert!(Command::parse("exit").execute(&rig.sensei, &source).await.is_none());
    assert_eq!(rig.provider.calls(), 0);
    assert_eq!(rig.embeddings.calls(), 0);
}

#[tokio::test]
async fn test_refresh_then_search() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();
    let source = StaticSource::new(catalogue());

    let reply = Command::parse("refresh").execute(&rig.sensei, &source).await;
    assert_eq!(reply.as_deref(), Some("Data refreshed! 4 offers ingested."));

    let reply = Command::parse("search running shoe").execute(&rig.sensei, &source).await;
    assert_eq!(reply.as_deref(), Some(REPLY));
    assert!(rig
        .provider
        .last_prompt()
        .unwrap()
        .contains("[View Offer](https://www.nike.com/in/sale)"));
}

#[tokio::test]
async fn test_refresh_reports_source_problems() {
    let dir = TempDir::new().unwrap();
    let rig = Rig::open(&dir.path().join("offer_index")).unwrap();

    let empty = StaticSource::default();
    let reply = Command::Refresh.execute(&rig.sensei, &empty).await;
    assert_eq!(reply.as_deref(), Some(prompts::REFRESH_EMPTY));

    let missing = JsonFileSource::new(dir.path().join("missing.json"));
    let reply = Command::Refresh.execute(&rig.sensei, &missing).await;
    assert_eq!(reply.as_deref(), Some(prompts::REFRESH_FAILED));
    assert!(rig.sensei.is_empty().await);
}
