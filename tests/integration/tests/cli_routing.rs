//! CLI routing integration tests.
//!
//! These go through the same `Cli` parser and `run` entry point the
//! `promosensei` binary uses, against a config in a temp directory.

use clap::Parser;
use promosensei_cli::{run, Cli, Commands};
use promosensei_core::config::Config;
use std::path::PathBuf;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("promosensei").chain(args.iter().copied()))
}

/// A config file whose store lives under `dir`.
fn write_config(dir: &TempDir) -> PathBuf {
    let mut config = Config::default();
    config.store.path = dir.path().join("data").join("offer_index");
    config.source.offers_file = dir.path().join("scraped_offers.json");
    let path = dir.path().join("config.json5");
    config.save(&path).unwrap();
    path
}

#[test]
fn test_cli_help_lists_commands() {
    let err = match parse(&["--help"]) {
        Err(e) => e,
        Ok(_) => panic!("--help should short-circuit parsing"),
    };
    let help = err.to_string();
    for command in ["search", "summary", "brand", "ingest", "stats", "chat", "config"] {
        assert!(help.contains(command), "help should mention '{}', got: {}", command, help);
    }
}

#[test]
fn test_cli_unknown_command() {
    assert!(parse(&["nonexistent-command"]).is_err());
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = parse(&["stats", "-vv", "--config", "/tmp/ps.json5"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/ps.json5")));
    assert!(matches!(cli.command, Commands::Stats));
}

#[test]
fn test_cli_chat_no_seed() {
    let cli = parse(&["chat", "--no-seed"]).unwrap();
    assert!(matches!(cli.command, Commands::Chat { no_seed: true }));
}

#[tokio::test]
async fn test_cli_version_runs() {
    run(parse(&["version"]).unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_cli_stats_needs_no_api_key() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let cli = parse(&["--config", config.to_str().unwrap(), "stats"]).unwrap();
    run(cli).await.unwrap();

    // Opening the store creates its directory.
    assert!(dir.path().join("data").is_dir());
}

#[tokio::test]
async fn test_cli_config_set_then_validate() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let config_arg = config.to_str().unwrap();

    let cli = parse(&["--config", config_arg, "config", "set", "query.summary_k", "9"]).unwrap();
    run(cli).await.unwrap();
    assert_eq!(Config::load(&config).unwrap().query.summary_k, 9);

    let cli = parse(&["--config", config_arg, "config", "set", "query.search_k", "0"]).unwrap();
    assert!(run(cli).await.is_err());
    assert_eq!(Config::load(&config).unwrap().query.search_k, 20);

    let cli = parse(&["--config", config_arg, "config", "validate"]).unwrap();
    run(cli).await.unwrap();
}

#[tokio::test]
async fn test_cli_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let config_arg = config.to_str().unwrap();

    let cli = parse(&["--config", config_arg, "config", "init"]).unwrap();
    assert!(run(cli).await.is_err());

    let cli = parse(&["--config", config_arg, "config", "init", "--force"]).unwrap();
    run(cli).await.unwrap();
    assert_eq!(
        Config::load(&config).unwrap().store.path,
        PathBuf::from("data/offer_index")
    );
}
