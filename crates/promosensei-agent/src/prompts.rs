//! Prompt templates and fixed replies.

/// System message sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for promotional offers.";

/// Reply when a query could not be answered.
pub const QUERY_APOLOGY: &str =
    "I apologize, but I encountered an error while processing your request. Please try again later.";

/// Reply when a summary could not be produced.
pub const SUMMARY_APOLOGY: &str =
    "I apologize, but I encountered an error while summarizing deals. Please try again later.";

/// Reply when a brand listing could not be produced.
pub const BRAND_APOLOGY: &str = "I apologize, but I encountered an error while retrieving offers for the specified brand. Please try again later.";

/// Reply to a summary request on an empty store.
pub const NO_DEALS: &str = "No deals are currently available to summarize.";

/// Reply to an empty search query.
pub const SEARCH_USAGE: &str = "Please provide a search query. Usage: `search [your query]`";

/// Reply to an empty brand name.
pub const BRAND_USAGE: &str = "Please provide a brand name. Usage: `brand [brand_name]`";

/// Reply when a refresh fetched nothing.
pub const REFRESH_EMPTY: &str = "Refresh completed, but no offers were scraped.";

/// Reply when a refresh failed.
pub const REFRESH_FAILED: &str = "An error occurred during refresh.";

const LINK_RULE: &str = "**Format any links as concise Markdown links like [View Offer](URL) and do NOT expand the full URL text.**";

/// Reply to a brand lookup on an empty store.
pub fn no_offers_in_store(brand: &str) -> String {
    format!("No offers available in the database to search for {}.", brand)
}

/// Reply to a brand lookup without matches.
pub fn brand_not_found(brand: &str) -> String {
    format!("I couldn't find any offers for {} at the moment.", brand)
}

/// Reply after a successful refresh.
pub fn refreshed(count: usize) -> String {
    format!("Data refreshed! {} offers ingested.", count)
}

/// Prompt for a query that retrieved nothing.
pub fn no_results(query: &str) -> String {
    format!(
        "The user asked: '{}'. I could not find any relevant offers in the database. \
         Please respond politely that no relevant offers were found for their query.",
        query
    )
}

/// Prompt for a query answered from retrieved offers.
pub fn answer(query: &str, context: &str) -> String {
    format!(
        "You are Promo Sensei, a helpful assistant that provides information about promotional offers. \
         Based on the following retrieved promotional offers, answer the user's query concisely and clearly. \
         If an offer is expired, mention it. Prioritize active offers. \
         Make sure to include the offer title, description, brand, and expiry date if available. \
         **Crucially, format any links as concise Markdown links like [View Offer](URL) and do NOT expand the full URL text.** \
         If the query is for a summary, provide a concise summary of the offers. \
         If the query is for a specific brand, list offers from that brand. \
         Contextual Offers:\n{}\n\nUser Query: {}\nYour Answer:",
        context, query
    )
}

/// Prompt for a summary of recent offers.
pub fn summary(context: &str) -> String {
    format!(
        "You are Promo Sensei, a helpful assistant. \
         Based on the following promotional offers, provide a concise summary of the top deals. \
         Highlight key discounts, brands, and categories. If an offer is expired, mention it. \
         Prioritize active offers. {}\n\n\
         Contextual Offers:\n{}\n\nYour Summary:",
        LINK_RULE, context
    )
}

/// Prompt for presenting one brand's offers.
pub fn brand(brand: &str, context: &str) -> String {
    format!(
        "You are Promo Sensei, a helpful assistant. \
         Here are the promotional offers for the brand '{}':\n\n{}\n\n\
         Please present these offers clearly and concisely to the user, focusing on key details like title, description, and expiry. \
         If any are expired, mention it. {} Your Answer:",
        brand, context, LINK_RULE
    )
}
