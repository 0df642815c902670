//! Rendering offers as context for the completion service.

use once_cell::sync::Lazy;
use promosensei_core::OfferRecord;
use regex::Regex;
use std::fmt::Write;

/// Context text used when retrieval produced nothing.
pub const NO_RELEVANT_OFFERS: &str = "No relevant offers found.";

const CONTEXT_HEADER: &str = "Here are the relevant promotional offers:\n\n";

const MISSING: &str = "N/A";

/// Flipkart tracking parameters that bloat shared links.
static TRACKING_PARAMS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(&param=[^&]*|&hpid=[^&]*|&ctx=[^&]*)").ok());

/// Strip Flipkart tracking parameters (`param`, `hpid`, `ctx`) from a link.
///
/// Only links on `flipkart.com` are touched. Parameters that matter for the
/// landing page (`pid`, `sid`, ...) are kept.
pub fn clean_flipkart_url(url: &str) -> String {
    if !url.contains("flipkart.com") {
        return url.to_string();
    }

    let cleaned = match TRACKING_PARAMS.as_ref() {
        Some(re) => re.replace_all(url, "").into_owned(),
        None => url.to_string(),
    };

    cleaned
        .trim_end_matches('&')
        .trim_end_matches('?')
        .to_string()
}

/// The link to show for an offer, cleaned for Flipkart offers.
///
/// Empty links and the literal `N/A` count as missing.
pub fn display_link(offer: &OfferRecord) -> Option<String> {
    let link = offer
        .offer_link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != MISSING)?;

    if offer.brand_contains("flipkart") {
        Some(clean_flipkart_url(link))
    } else {
        Some(link.to_string())
    }
}

/// Render offers as a numbered context block.
///
/// An empty slice renders as [`NO_RELEVANT_OFFERS`].
pub fn format_offers(offers: &[OfferRecord]) -> String {
    if offers.is_empty() {
        return NO_RELEVANT_OFFERS.to_string();
    }

    let mut out = String::from(CONTEXT_HEADER);
    for (i, offer) in offers.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "Offer {}:\n  Title: {}\n  Description: {}\n  Brand: {}\n  Expiry Date: {}\n",
            i + 1,
            field(&offer.title),
            field(&offer.description),
            field(&offer.brand_name),
            field(&offer.expiry_date),
        );
        match display_link(offer) {
            Some(link) => {
                let _ = write!(out, "  Link: [View Offer]({})\n\n", link);
            }
            None => out.push_str("  Link: N/A\n\n"),
        }
    }
    out
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}
