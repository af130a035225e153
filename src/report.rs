// file: src/report.rs
// description: combined company report from search results and stock metrics

use crate::error::Result;
use crate::search::EnrichedResult;
use crate::stocks::StockAnalysis;

/// Render the combined research report: header, enriched search hits, then
/// the stock metric block (or the no-data notice when metrics are absent).
pub fn render(
    company: &str,
    ticker: &str,
    results: &[EnrichedResult],
    stock: Option<&StockAnalysis>,
) -> Result<String> {
    let mut out = String::new();

    out.push_str("## Report\n");
    out.push_str(&format!("Company: {company}\n"));
    out.push_str(&format!("Ticker: {ticker}\n\n"));

    out.push_str("### Web Results\n");
    if results.is_empty() {
        out.push_str("No search results found.\n");
    }
    for result in results {
        out.push_str(&format!("**{}**\n", result.title));
        if !result.snippet.is_empty() {
            out.push_str(&format!("{}\n", result.snippet));
        }
        if !result.body.is_empty() {
            out.push_str(&format!("{}\n", result.body));
        }
        out.push_str(&format!("[Link]({})\n\n", result.link));
    }

    out.push_str("### Stock Analysis\n");
    match stock {
        Some(analysis) => {
            out.push_str(&serde_json::to_string_pretty(analysis)?);
            out.push('\n');
        }
        None => {
            out.push_str("No historical data available for the specified ticker.\n");
        }
    }

    Ok(out)
}
