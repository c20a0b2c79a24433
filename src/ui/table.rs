//! Plain-text rendering of search results for the CLI.

use colored::Colorize;

use crate::model::types::SearchHit;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Try refining your input.";

const TITLE_MAX: usize = 60;

/// Format a rating the way the results table shows it; `-` when unknown.
pub fn format_rating(vote: Option<f64>) -> String {
    vote.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

/// Render hits as an aligned table. `scores`, when given, adds a score column
/// and must be the same length as `hits`.
pub fn render_table(hits: &[SearchHit], scores: Option<&[Option<f64>]>, styled: bool) -> String {
    if hits.is_empty() {
        return format!("{NO_RESULTS_MESSAGE}\n");
    }

    let titles: Vec<String> = hits.iter().map(|h| truncate(&h.title, TITLE_MAX)).collect();
    let title_width = titles
        .iter()
        .map(|t| t.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());

    let mut header = format!("{:<title_width$}  {:>6}  {:<12}", "Title", "Rating", "Release Date");
    if scores.is_some() {
        header.push_str("   Score");
    }
    let header = header.trim_end().to_string();

    let mut out = String::new();
    if styled {
        out.push_str(&header.bold().to_string());
    } else {
        out.push_str(&header);
    }
    out.push('\n');

    for (idx, (hit, title)) in hits.iter().zip(&titles).enumerate() {
        let pad = title_width - title.chars().count();
        let mut line = format!(
            "{title}{:pad$}  {:>6}  {:<12}",
            "",
            format_rating(hit.vote_average),
            hit.release_date,
        );
        if let Some(score) = scores.and_then(|s| s.get(idx)) {
            let cell = score.map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
            line.push_str(&format!("  {cell:>6}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
