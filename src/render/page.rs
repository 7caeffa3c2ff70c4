//! The dashboard page and its target regions.

use super::dom::{Container, Element};
use super::templates;

/// Id of the scrape log list.
pub const LOG_LIST_ID: &str = "log-list";
/// Id of the scrape log table; rows go into its `tbody`.
pub const LOG_TABLE_ID: &str = "scrape-log";
/// Id of the model count label.
pub const MODEL_COUNT_ID: &str = "model-count";

/// Column headers of the scrape log table.
pub const LOG_TABLE_HEADERS: [&str; 4] = ["Time", "Board", "Added", "Removed"];

/// `<ul id="log-list">`
#[derive(Debug, Clone, PartialEq)]
pub struct ListTarget(Element);

impl Default for ListTarget {
    fn default() -> Self {
        Self(Element::new("ul").with_attr("id", LOG_LIST_ID))
    }
}

impl Container for ListTarget {
    fn element(&self) -> &Element {
        &self.0
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.0
    }
}

/// `<tbody>` of `<table id="scrape-log">`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBody(Element);

impl Default for TableBody {
    fn default() -> Self {
        Self(Element::new("tbody"))
    }
}

impl Container for TableBody {
    fn element(&self) -> &Element {
        &self.0
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.0
    }
}

impl TableBody {
    /// The full table, header included, wrapping this body.
    pub fn table(&self) -> Element {
        let header = LOG_TABLE_HEADERS
            .iter()
            .fold(Element::new("tr"), |row, h| {
                row.with_child(Element::new("th").with_text(*h))
            });
        Element::new("table")
            .with_attr("id", LOG_TABLE_ID)
            .with_attr("class", "file-listing")
            .with_child(Element::new("thead").with_child(header))
            .with_child(self.0.clone())
    }
}

/// `<p id="model-count">`
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel(Element);

impl Default for TextLabel {
    fn default() -> Self {
        Self(Element::new("p").with_attr("id", MODEL_COUNT_ID))
    }
}

impl Container for TextLabel {
    fn element(&self) -> &Element {
        &self.0
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.0
    }
}

impl TextLabel {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.0.set_text(text);
    }

    pub fn text(&self) -> String {
        self.0.text_content()
    }
}

/// Page layout: which regions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub show_model_count: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            show_model_count: true,
        }
    }
}

/// One page view with its three target regions.
///
/// The list and table always exist; the count label only when the layout
/// asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    pub log_list: ListTarget,
    pub log_table: TableBody,
    pub model_count: Option<TextLabel>,
}

impl DashboardPage {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            log_list: ListTarget::default(),
            log_table: TableBody::default(),
            model_count: layout.show_model_count.then(TextLabel::default),
        }
    }

    /// Regions in page order, serialized.
    pub fn body_html(&self) -> String {
        let mut out = String::new();
        if let Some(ref label) = self.model_count {
            out.push_str(&label.element().to_html());
        }
        out.push_str("<h2>Recent scrapes</h2>");
        out.push_str(&self.log_list.element().to_html());
        out.push_str("<h2>Scrape log</h2>");
        out.push_str(&self.log_table.table().to_html());
        out
    }

    /// Complete HTML document.
    pub fn to_document(&self, title: &str) -> String {
        templates::base_template(title, &self.body_html())
    }
}
