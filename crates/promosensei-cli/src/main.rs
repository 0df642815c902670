//! Promo Sensei CLI entry point.

use clap::Parser;
use promosensei_cli::{run, Cli};
use promosensei_core::config::LogLevel;
use promosensei_core::{env, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values never override the real environment
    let _ = env::load_dotenv();

    let cli = Cli::parse();

    let level = Config::load_or_default(cli.config.as_deref())
        .ok()
        .map(|c| c.logging.level);

    // Logs go to stderr so stdout carries only answers
    tracing_subscriber::registry()
        .with(log_filter(cli.verbose, level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli).await
}

/// `RUST_LOG`, then `PROMOSENSEI_LOG`, then `-v` flags, then the config level.
fn log_filter(verbose: u8, level: Option<LogLevel>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_env(env::vars::PROMOSENSEI_LOG) {
        return filter;
    }

    let level = match verbose {
        0 => level.unwrap_or_default().as_str(),
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::new(format!("promosensei={}", level))
}
