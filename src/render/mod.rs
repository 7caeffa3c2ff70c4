//! Render layer: maps records onto the page's target regions.
//!
//! Every render function clears its target before appending, so calling it
//! again replaces the previous content. Input order is preserved.

mod datetime;
mod dom;
mod page;
pub mod templates;

pub use datetime::{DateFormatter, ViewerZone, DEFAULT_DATE_FORMAT, INVALID_DATE};
pub use dom::{Container, Element, Node};
pub use page::{
    DashboardPage, ListTarget, PageLayout, TableBody, TextLabel, LOG_LIST_ID, LOG_TABLE_HEADERS,
    LOG_TABLE_ID, MODEL_COUNT_ID,
};

use crate::models::ScrapeLogEntry;

/// Shown for a missing board.
pub const PLACEHOLDER: &str = "—";
/// Marker in front of the added count.
pub const ADDED_MARKER: &str = "🟢 ";
/// Marker in front of the removed count.
pub const REMOVED_MARKER: &str = "🔴 ";
/// CSS class of rows and items for runs that reported failure.
pub const FAILED_CLASS: &str = "scrape-failed";

fn board_or_placeholder(entry: &ScrapeLogEntry) -> &str {
    entry.board.as_deref().unwrap_or(PLACEHOLDER)
}

fn entry_time(entry: &ScrapeLogEntry, formatter: &DateFormatter) -> String {
    match entry.timestamp {
        Some(ts) => formatter.format_epoch_seconds(ts.seconds),
        None => INVALID_DATE.to_string(),
    }
}

/// One line of the log list.
pub fn log_line(entry: &ScrapeLogEntry, formatter: &DateFormatter) -> String {
    format!(
        "{}: {} added, {} removed from {}",
        entry_time(entry, formatter),
        entry.added.unwrap_or(0),
        entry.removed.unwrap_or(0),
        board_or_placeholder(entry)
    )
}

/// Sentence written into the model count label.
pub fn model_count_text(count: u64) -> String {
    format!("Total models in database: {}", count)
}

/// Tag a failed run with the failure class and its error as a tooltip.
fn mark_failure(mut el: Element, entry: &ScrapeLogEntry) -> Element {
    if entry.failed() {
        el.set_attr("class", FAILED_CLASS);
    }
    if let Some(ref error) = entry.error {
        el.set_attr("title", error);
    }
    el
}

/// Replace the list's items with one line per entry.
pub fn render_log_list(
    target: &mut ListTarget,
    entries: &[ScrapeLogEntry],
    formatter: &DateFormatter,
) {
    target.clear();
    for entry in entries {
        let item = Element::new("li").with_text(log_line(entry, formatter));
        target.append(mark_failure(item, entry));
    }
}

/// Replace the table body's rows with one four-cell row per entry.
pub fn render_log_table(
    target: &mut TableBody,
    entries: &[ScrapeLogEntry],
    formatter: &DateFormatter,
) {
    target.clear();
    for entry in entries {
        let row = Element::new("tr")
            .with_child(Element::new("td").with_text(entry_time(entry, formatter)))
            .with_child(Element::new("td").with_text(board_or_placeholder(entry)))
            .with_child(
                Element::new("td")
                    .with_attr("class", "added")
                    .with_text(format!("{}{}", ADDED_MARKER, entry.added.unwrap_or(0))),
            )
            .with_child(
                Element::new("td")
                    .with_attr("class", "removed")
                    .with_text(format!("{}{}", REMOVED_MARKER, entry.removed.unwrap_or(0))),
            );
        target.append(mark_failure(row, entry));
    }
}

/// Write the count sentence into the label, if the page has one.
pub fn render_model_count(target: Option<&mut TextLabel>, count: u64) {
    if let Some(label) = target {
        label.set_text(model_count_text(count));
    }
}
