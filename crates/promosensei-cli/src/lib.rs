//! Promo Sensei command-line interface.

pub mod commands;
pub mod render;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promo Sensei - ask questions about scraped promotional offers
#[derive(Parser)]
#[command(name = "promosensei")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "PROMOSENSEI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Answer a question from the most relevant offers
    Search {
        /// The question, e.g. "flat 50% off on shoes"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Summarize the most recently ingested offers
    Summary {
        /// Number of offers to summarize (defaults to query.summary_k; 0 means all)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List the offers of one brand
    Brand {
        /// Brand name, matched case-insensitively
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Embed offers from a scraper export and add them to the store
    Ingest {
        /// JSON file of offers (defaults to source.offers_file)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Ingest even if the store already holds offers
        #[arg(long)]
        force: bool,
    },

    /// Show what the offer store holds
    Stats,

    /// Start an interactive chat session
    Chat {
        /// Skip the initial ingest into an empty store
        #[arg(long)]
        no_seed: bool,
    },

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Search { query } => commands::offers::search(config_path, &query.join(" ")).await,
        Commands::Summary { count } => commands::offers::summary(config_path, count).await,
        Commands::Brand { name } => commands::offers::brand(config_path, &name.join(" ")).await,
        Commands::Ingest { file, force } => {
            commands::offers::ingest(config_path, file, force).await
        }
        Commands::Stats => commands::offers::stats(config_path).await,
        Commands::Chat { no_seed } => repl::run(config_path, !no_seed).await,
        Commands::Config(args) => commands::config::run(config_path, args).await,
        Commands::Version => {
            println!("promosensei {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
