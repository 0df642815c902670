//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use promosensei_agent::SenseiSettings;
use promosensei_core::config::Config;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.completion.model, config.completion.model);
    assert_eq!(loaded.embeddings.model, config.embeddings.model);
    assert_eq!(loaded.store.path, config.store.path);
    assert_eq!(loaded.query.search_k, config.query.search_k);
    assert_eq!(loaded.query.summary_k, config.query.summary_k);
    loaded.validate().unwrap();
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let mut config = Config::default();
    config.query.search_k = 7;
    config.completion.max_tokens = 256;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    let settings = SenseiSettings::from_config(&loaded);
    assert_eq!(settings.search_k, 7);
    assert_eq!(settings.max_tokens, 256);
}

#[test]
fn test_config_parses_json5() {
    let config = Config::parse(
        r#"{
            // trailing commas and comments are fine
            query: { summary_k: 3, },
            store: { path: "/tmp/offers/index" },
        }"#,
    )
    .unwrap();
    assert_eq!(config.query.summary_k, 3);
    assert_eq!(config.query.search_k, 20);
    assert_eq!(config.store.path, Path::new("/tmp/offers/index"));
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/config.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
