//! Terminal rendering utilities.

use console::style;
use promosensei_agent::StoreStats;
use promosensei_memory::IngestReport;

/// Render markdown text to the terminal.
pub fn render_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

/// Print a dimmed progress line to stderr.
pub fn render_progress(message: &str) {
    eprintln!("{} {}", style("~").yellow(), style(message).dim());
}

/// Print the outcome of an ingestion run.
pub fn render_ingest_report(report: &IngestReport, total: usize) {
    let marker = if report.skipped == 0 {
        style("*").green()
    } else {
        style("!").yellow()
    };
    println!(
        "{} Ingested {} of {} offers ({} skipped). Store now holds {}.",
        marker,
        style(report.embedded).cyan(),
        report.submitted,
        report.skipped,
        style(total).cyan(),
    );
}

/// Print store statistics.
pub fn render_stats(stats: &StoreStats) {
    println!("{}", style("Offer store").bold());
    println!("  {} {}", style("offers:").dim(), stats.offers);
    println!(
        "  {} {}",
        style("dimension:").dim(),
        stats
            .dimension
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unset".to_string())
    );
    println!("  {} {}", style("expired:").dim(), stats.expired);
    println!("  {} {}", style("index:").dim(), stats.index_path.display());
    println!("  {} {}", style("metadata:").dim(), stats.metadata_path.display());

    if !stats.brands.is_empty() {
        println!("{}", style("Brands").bold());
        for (brand, count) in &stats.brands {
            println!("  {:<24} {}", brand, style(count).cyan());
        }
    }
}

/// Print the welcome banner for the chat.
pub fn render_welcome(model: &str, offers: usize) {
    eprintln!(
        "{} {} {}",
        style("promosensei").bold().cyan(),
        style("chat").dim(),
        style(format!("({}, {} offers)", model, offers)).dim(),
    );
    eprintln!(
        "{}",
        style("Commands: search [query], summary, brand [brand_name], refresh, help, exit").dim()
    );
    eprintln!();
}
