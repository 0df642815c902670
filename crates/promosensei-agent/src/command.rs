//! Chat command parsing and dispatch.

use crate::prompts;
use crate::sensei::PromoSensei;
use crate::source::OfferSource;

/// Help text listing the chat commands.
pub const HELP: &str = "Here are the available commands:\n\
`search [query]` - Find deals based on a user query\n\
`summary` - Provide a summary of top deals\n\
`brand [brand_name]` - List current offers by a specific brand\n\
`refresh` - Trigger the scrape and ingestion cycle\n\
`exit` - Leave the chat";

/// A parsed chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer a free-text query.
    Search(String),
    /// Summarize recent deals.
    Summary,
    /// List a brand's offers.
    Brand(String),
    /// Re-read the offer source and ingest it.
    Refresh,
    /// Show the command list.
    Help,
    /// Leave the chat.
    Exit,
    /// A known command missing its argument; carries the usage text.
    Usage(&'static str),
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parse one line of chat input.
    ///
    /// The keyword is matched case-insensitively; the rest of the line is the
    /// argument.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (keyword, rest) = match input.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (input, ""),
        };

        match keyword.to_lowercase().as_str() {
            "search" if rest.is_empty() => Self::Usage(prompts::SEARCH_USAGE),
            "search" => Self::Search(rest.to_string()),
            "brand" if rest.is_empty() => Self::Usage(prompts::BRAND_USAGE),
            "brand" => Self::Brand(rest.to_string()),
            "summary" if rest.is_empty() => Self::Summary,
            "refresh" if rest.is_empty() => Self::Refresh,
            "help" | "?" => Self::Help,
            "exit" | "quit" if rest.is_empty() => Self::Exit,
            _ => Self::Unknown(input.to_string()),
        }
    }

    /// Whether this command ends the chat.
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit)
    }

    /// A short progress line to show before running the command, if any.
    pub fn progress(&self) -> Option<String> {
        match self {
            Self::Search(query) => Some(format!("Searching for deals related to '{}'...", query)),
            Self::Summary => Some("Generating a summary of top deals...".to_string()),
            Self::Brand(brand) => Some(format!("Listing offers for brand: '{}'...", brand)),
            Self::Refresh => Some("Starting refresh... Please wait.".to_string()),
            _ => None,
        }
    }

    /// Run the command and produce the reply text.
    ///
    /// Returns `None` for [`Command::Exit`].
    pub async fn execute(&self, sensei: &PromoSensei, source: &dyn OfferSource) -> Option<String> {
        let reply = match self {
            Self::Search(query) => sensei.answer_query(query).await,
            Self::Summary => sensei.summarize().await,
            Self::Brand(brand) => sensei.list_by_brand(brand).await,
            Self::Refresh => sensei.refresh(source).await,
            Self::Help => HELP.to_string(),
            Self::Usage(usage) => usage.to_string(),
            Self::Unknown(_) => format!("I didn't understand that command. {}", HELP),
            Self::Exit => return None,
        };
        Some(reply)
    }
}
