//! Terminal output helpers: spinners and retrieval tables

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::domain::models::RetrievalResult;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const PREVIEW_CHARS: usize = 60;

/// Spinner drawn on stderr while a long operation runs.
///
/// Hidden when stderr is not a terminal so piped output stays clean.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    if !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        spinner.set_style(style.tick_chars(SPINNER_CHARS));
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Render retrieved chunks as a table, most similar first
pub fn format_sources(result: &RetrievalResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Chunk").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
        ]);

    for (rank, hit) in result.hits.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(hit.position).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", hit.score)).set_alignment(CellAlignment::Right),
            Cell::new(single_line_preview(&hit.text)),
        ]);
    }

    table.to_string()
}

/// Styled heading for stderr status lines
pub fn heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

fn single_line_preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        format!("{}...", flat.chars().take(PREVIEW_CHARS).collect::<String>())
    }
}
