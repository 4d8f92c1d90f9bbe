//! Caller-supplied templates: new rows, cards and detail panels

use std::fmt;
use std::sync::Arc;

use crate::render::escape_html;
use crate::row::{value_text, Row};

/// Produces the initial values of a row created from the keyboard
pub type RowTemplate = Arc<dyn Fn() -> Row + Send + Sync>;

/// Renders one card (row, index) in cards mode
pub type CardTemplate = Arc<dyn Fn(&Row, usize) -> String + Send + Sync>;

/// Content of the detail panel shown under an expanded row
#[derive(Clone)]
pub enum DetailsTemplate {
    /// Markup computed from the row. Inserted raw.
    Function(Arc<dyn Fn(&Row) -> String + Send + Sync>),
    /// Static markup with `{{field}}` placeholders, filled with escaped values
    Html(String),
}

impl DetailsTemplate {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Row) -> String + Send + Sync + 'static,
    {
        DetailsTemplate::Function(Arc::new(f))
    }

    pub fn render(&self, row: &Row) -> String {
        match self {
            DetailsTemplate::Function(f) => f(row),
            DetailsTemplate::Html(html) => interpolate(html, row),
        }
    }
}

impl fmt::Debug for DetailsTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailsTemplate::Function(_) => f.write_str("DetailsTemplate::Function(<fn>)"),
            DetailsTemplate::Html(html) => f.debug_tuple("DetailsTemplate::Html").field(html).finish(),
        }
    }
}

impl From<String> for DetailsTemplate {
    fn from(html: String) -> Self {
        DetailsTemplate::Html(html)
    }
}

impl From<&str> for DetailsTemplate {
    fn from(html: &str) -> Self {
        DetailsTemplate::Html(html.to_string())
    }
}

/// Replace `{{ field }}` with the escaped text of `row[field]`
///
/// Unknown fields become empty; an unterminated `{{` is kept verbatim.
pub fn interpolate(template: &str, row: &Row) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let field = after[..end].trim();
                if let Some(value) = row.get(field) {
                    out.push_str(&escape_html(&value_text(value)));
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
