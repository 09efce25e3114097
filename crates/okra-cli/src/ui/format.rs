//! Answer-bundle rendering for human output.

use comfy_table::{presets, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use okra_core::{ActionPriority, RankedSource};

/// Confidence below which the badge renders red.
const LOW_CONFIDENCE: f32 = 0.4;

/// Confidence at or above which the badge renders green.
const HIGH_CONFIDENCE: f32 = 0.7;

/// Render a section header.
pub fn section(title: &str, colors: bool) -> String {
    if colors {
        title.bold().to_string()
    } else {
        title.to_string()
    }
}

/// Render a confidence value as a colored percentage badge.
pub fn confidence_badge(confidence: f32, colors: bool) -> String {
    let percent = format!("{:.0}%", confidence * 100.0);
    if !colors {
        return percent;
    }

    if confidence >= HIGH_CONFIDENCE {
        percent.green().to_string()
    } else if confidence >= LOW_CONFIDENCE {
        percent.yellow().to_string()
    } else {
        percent.red().to_string()
    }
}

/// Render an action priority label.
pub fn priority_label(priority: ActionPriority, colors: bool) -> String {
    let label = format!("[{}]", priority);
    if !colors {
        return label;
    }

    match priority {
        ActionPriority::High => label.red().to_string(),
        ActionPriority::Medium => label.yellow().to_string(),
        ActionPriority::Low => label.dimmed().to_string(),
    }
}

/// Render the sources table.
pub fn sources_table(sources: &[RankedSource]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Kind", "Title", "Relevance"]);

    for (index, source) in sources.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(source.record.kind),
            Cell::new(&source.record.title),
            Cell::new(format!("{:.3}", source.relevance)),
        ]);
    }

    table
}
