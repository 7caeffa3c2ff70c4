//! Fetch-and-render flows for one page view.
//!
//! The scrape log flow (list + table) and the model count flow run
//! concurrently; each runs its own steps in sequence and writes only its own
//! regions. Failures are reported to an [`ErrorHandler`] and returned as a
//! [`FlowOutcome`].

use tracing::{debug, warn};

use crate::error::QueryError;
use crate::firestore::DocumentStore;
use crate::queries::{fetch_model_count, fetch_recent_scrape_logs};
use crate::render::{
    render_log_list, render_log_table, render_model_count, Container, DashboardPage,
    DateFormatter, Element, ListTarget, PageLayout, TableBody, TextLabel,
};

/// Everything a page view needs besides the database.
#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub formatter: DateFormatter,
    pub layout: PageLayout,
    pub log_limit: Option<u32>,
    /// Placeholder for an empty scrape history; None leaves regions empty.
    pub empty_message: Option<String>,
    pub title: String,
}

/// Result of one flow.
#[derive(Debug)]
pub enum FlowOutcome {
    Rendered,
    Failed(QueryError),
}

impl FlowOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, FlowOutcome::Rendered)
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            FlowOutcome::Failed(e) => Some(e),
            FlowOutcome::Rendered => None,
        }
    }
}

/// Receives flow failures together with the regions the flow owns.
pub trait ErrorHandler: Send + Sync {
    fn on_logs_failed(&self, error: &QueryError, list: &mut ListTarget, table: &mut TableBody);

    fn on_count_failed(&self, error: &QueryError, label: Option<&mut TextLabel>);
}

/// Leaves failed regions as they were.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentHandler;

impl ErrorHandler for SilentHandler {
    fn on_logs_failed(&self, error: &QueryError, _list: &mut ListTarget, _table: &mut TableBody) {
        debug!("Scrape log query failed: {}", error);
    }

    fn on_count_failed(&self, error: &QueryError, _label: Option<&mut TextLabel>) {
        debug!("Model count query failed: {}", error);
    }
}

/// Writes an error message into each failed region.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleErrorHandler;

/// Label text when the count can't be loaded.
pub const COUNT_ERROR_TEXT: &str = "Failed to load model count";

impl ErrorHandler for VisibleErrorHandler {
    fn on_logs_failed(&self, error: &QueryError, list: &mut ListTarget, table: &mut TableBody) {
        warn!("Scrape log query failed: {}", error);
        let message = format!("Failed to load scrape logs: {}", error);

        list.clear();
        list.append(
            Element::new("li")
                .with_attr("class", "error")
                .with_text(message.clone()),
        );

        table.clear();
        table.append(message_row("error", &message));
    }

    fn on_count_failed(&self, error: &QueryError, label: Option<&mut TextLabel>) {
        warn!("Model count query failed: {}", error);
        if let Some(label) = label {
            label.element_mut().set_attr("class", "error");
            label.element_mut().set_attr("title", &error.to_string());
            label.set_text(COUNT_ERROR_TEXT);
        }
    }
}

/// A single cell spanning the whole log table.
fn message_row(class: &str, message: &str) -> Element {
    Element::new("tr").with_attr("class", class).with_child(
        Element::new("td")
            .with_attr("colspan", "4")
            .with_text(message),
    )
}

/// Query scrape logs, then fill the list and the table.
pub async fn load_logs(
    store: &dyn DocumentStore,
    options: &DashboardOptions,
    handler: &dyn ErrorHandler,
    list: &mut ListTarget,
    table: &mut TableBody,
) -> FlowOutcome {
    match fetch_recent_scrape_logs(store, options.log_limit).await {
        Ok(entries) => {
            render_log_list(list, &entries, &options.formatter);
            render_log_table(table, &entries, &options.formatter);
            if entries.is_empty() {
                if let Some(ref message) = options.empty_message {
                    list.append(
                        Element::new("li")
                            .with_attr("class", "empty")
                            .with_text(message.as_str()),
                    );
                    table.append(message_row("empty", message));
                }
            }
            FlowOutcome::Rendered
        }
        Err(e) => {
            handler.on_logs_failed(&e, list, table);
            FlowOutcome::Failed(e)
        }
    }
}

/// Query the model count, then fill the label.
pub async fn load_model_count(
    store: &dyn DocumentStore,
    handler: &dyn ErrorHandler,
    label: Option<&mut TextLabel>,
) -> FlowOutcome {
    match fetch_model_count(store).await {
        Ok(count) => {
            render_model_count(label, count);
            FlowOutcome::Rendered
        }
        Err(e) => {
            handler.on_count_failed(&e, label);
            FlowOutcome::Failed(e)
        }
    }
}

/// A rendered page view and how each flow went.
#[derive(Debug)]
pub struct DashboardView {
    pub page: DashboardPage,
    pub logs: FlowOutcome,
    pub model_count: FlowOutcome,
}

impl DashboardView {
    pub fn all_rendered(&self) -> bool {
        self.logs.is_rendered() && self.model_count.is_rendered()
    }
}

/// Render one page view, running both flows concurrently.
pub async fn render_dashboard(
    store: &dyn DocumentStore,
    options: &DashboardOptions,
    handler: &dyn ErrorHandler,
) -> DashboardView {
    let mut page = DashboardPage::new(options.layout);
    let DashboardPage {
        log_list,
        log_table,
        model_count,
    } = &mut page;

    let (logs, count) = tokio::join!(
        load_logs(store, options, handler, log_list, log_table),
        load_model_count(store, handler, model_count.as_mut()),
    );

    DashboardView {
        page,
        logs,
        model_count: count,
    }
}
