//! Grid rendering
//!
//! The grid never touches a DOM. It describes every visual change as a
//! [`Patch`] and queues it; a host drains the queue into a [`RenderSink`].
//!
//! ```text
//! DataGrid ──patches──▶ RenderSink
//!                        ├── browser binding (real DOM)
//!                        └── DomMirror (headless, tests + CLI)
//! ```
//!
//! Full renders ship a complete [`View`]; `add_row`, `update_row` and
//! `delete_row` ship incremental patches so unaffected rows keep their
//! scroll position and focus.

mod format;
pub mod html;
mod mirror;

pub use format::{format_cell, format_number, FormatOptions};
pub use mirror::{DomMirror, MirrorRow};

use crate::column::Align;
use crate::navigation::CellPosition;
use crate::row::RowKey;
use crate::validation::ValidationAttrs;

/// Rendered cell content. `Raw` is inserted as markup, `Escaped` as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Escaped(String),
    Raw(String),
}

impl CellContent {
    /// Markup safe to splice into HTML
    pub fn to_html(&self) -> String {
        match self {
            CellContent::Escaped(text) => escape_html(text),
            CellContent::Raw(html) => html.clone(),
        }
    }

    /// The unescaped payload
    pub fn as_str(&self) -> &str {
        match self {
            CellContent::Escaped(s) | CellContent::Raw(s) => s,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, CellContent::Raw(_))
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Column header as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub align: Align,
    pub width: Option<String>,
    pub editable: bool,
}

/// A rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub key: RowKey,
    /// Value of the row's `data-row` attribute
    pub index: usize,
    pub cells: Vec<CellContent>,
    pub selected: bool,
}

/// A rendered card (cards mode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub key: RowKey,
    pub index: usize,
    pub html: String,
}

/// Output of a full render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Table {
        header: Vec<HeaderCell>,
        rows: Vec<RenderedRow>,
        /// Open detail panels: (row key, panel markup)
        details: Vec<(RowKey, String)>,
        /// Set when there are no rows
        empty_message: Option<String>,
    },
    Cards {
        cards: Vec<RenderedCard>,
        empty_message: Option<String>,
    },
}

/// The floating editor placed over a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOverlay {
    pub position: CellPosition,
    pub row_key: RowKey,
    pub column_key: String,
    /// `<textarea>` instead of `<input>`
    pub multiline: bool,
    /// Raw (unformatted) value copied into the editor
    pub value: String,
    pub attrs: ValidationAttrs,
}

/// One visual change
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Remove the table's delegated listeners before its markup is replaced
    DetachListeners,
    /// Replace everything with a freshly rendered view
    Render(View),
    /// Install the four delegated listeners (click, dblclick, keydown, focusin)
    AttachListeners,
    AppendRow(RenderedRow),
    RemoveRow(RowKey),
    /// Set every row's `data-row` to its DOM position
    ReindexRows,
    UpdateCell {
        key: RowKey,
        col: usize,
        content: CellContent,
    },
    ShowDetails {
        key: RowKey,
        html: String,
    },
    HideDetails(RowKey),
    ShowEmpty(String),
    HideEmpty,
    SelectRow {
        key: RowKey,
        selected: bool,
    },
    OpenEditor(EditorOverlay),
    CloseEditor,
    /// Show the browser's validity message on the open editor
    ReportValidity(String),
    FocusCell(CellPosition),
    FocusEditor,
}

/// Consumer of patches
pub trait RenderSink {
    fn apply(&mut self, patch: &Patch);

    fn apply_all(&mut self, patches: &[Patch]) {
        for patch in patches {
            self.apply(patch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_cell_content_html() {
        let escaped = CellContent::Escaped("<b>".into());
        let raw = CellContent::Raw("<b>".into());
        assert_eq!(escaped.to_html(), "&lt;b&gt;");
        assert_eq!(raw.to_html(), "<b>");
        assert!(raw.is_raw());
        assert_eq!(escaped.as_str(), "<b>");
    }
}
