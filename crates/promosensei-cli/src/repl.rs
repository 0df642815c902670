//! Interactive chat loop.
//!
//! Provides `promosensei chat` with rustyline line editing, command
//! completion, and markdown rendering of replies.

use crate::commands::load_config;
use crate::render;
use anyhow::Context;
use promosensei_agent::{Command, JsonFileSource, PromoSensei};
use promosensei_core::paths;
use rustyline::error::ReadlineError;
use rustyline::highlight::MatchingBracketHighlighter;
use rustyline::hint::HistoryHinter;
use rustyline::{CompletionType, Config, EditMode, Editor};
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};
use std::path::{Path, PathBuf};
use tracing::warn;

const COMMANDS: &[&str] = &["search ", "summary", "brand ", "refresh", "help", "exit", "quit"];

/// Tab-completion helper for chat commands.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct ReplHelper {
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Highlighter)]
    highlighter: MatchingBracketHighlighter,
}

impl rustyline::completion::Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let prefix = &line[..pos];
        if prefix.contains(' ') {
            return Ok((pos, Vec::new()));
        }
        Ok((0, complete_command(prefix)))
    }
}

fn complete_command(prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    COMMANDS
        .iter()
        .filter(|c| c.starts_with(&prefix))
        .map(|c| c.to_string())
        .collect()
}

/// Run the chat session.
///
/// With `seed`, an empty store is first filled from the configured offer
/// file. A failed seed is logged and the chat starts anyway.
pub async fn run(config_path: Option<&Path>, seed: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let sensei = PromoSensei::from_config(&config).context("Failed to start Promo Sensei")?;
    let source = JsonFileSource::new(config.source.offers_file.clone());

    if seed {
        match sensei.seed_if_empty(&source).await {
            Ok(Some(report)) => render::render_ingest_report(&report, sensei.len().await),
            Ok(None) => {}
            Err(e) => warn!(
                "Initial ingest failed: {}. Continuing without data; use 'refresh' to populate.",
                e
            ),
        }
    }

    render::render_welcome(&sensei.settings().model, sensei.len().await);

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let helper = ReplHelper {
        hinter: HistoryHinter::new(),
        highlighter: MatchingBracketHighlighter::new(),
    };

    let mut rl: Editor<ReplHelper, rustyline::history::FileHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    let history_file = paths::history_file().unwrap_or_else(|_| PathBuf::from(".promosensei_history"));
    let _ = rl.load_history(&history_file);

    loop {
        let prompt = console::style("You: ").green().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = Command::parse(trimmed);
                if let Some(progress) = command.progress() {
                    render::render_progress(&progress);
                }

                match command.execute(&sensei, &source).await {
                    Some(reply) => {
                        eprintln!();
                        render::render_markdown(&reply);
                        eprintln!();
                    }
                    None => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C clears the line; Ctrl-D or `exit` leaves.
                eprintln!("{}", console::style("^C (type exit to quit)").dim());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}: {}", console::style("Error").red(), err);
                break;
            }
        }
    }

    if let Some(dir) = history_file.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let _ = rl.save_history(&history_file);

    eprintln!("{}", console::style("Goodbye!").dim());
    Ok(())
}
