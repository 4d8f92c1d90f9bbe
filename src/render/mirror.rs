//! Headless render sink
//!
//! Keeps a simulated table in step with the patch stream so tests (and the
//! CLI) can inspect what a browser would show without one.

use super::html::{card_html, details_html, editor_html, empty_html, header_html, row_html};
use super::{CellContent, EditorOverlay, HeaderCell, Patch, RenderSink, RenderedCard, RenderedRow, View};
use crate::navigation::CellPosition;
use crate::row::RowKey;

/// A `<tr>` as the mirror holds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRow {
    pub key: RowKey,
    /// Current `data-row` attribute
    pub data_row: usize,
    pub cells: Vec<CellContent>,
    pub selected: bool,
    /// Markup of the open detail panel, if any
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Layout {
    #[default]
    Table,
    Cards,
}

/// Simulated DOM
#[derive(Debug, Clone, Default)]
pub struct DomMirror {
    layout: Layout,
    header: Vec<HeaderCell>,
    pub rows: Vec<MirrorRow>,
    pub cards: Vec<RenderedCard>,
    pub empty_message: Option<String>,
    pub editor: Option<EditorOverlay>,
    pub focused: Option<CellPosition>,
    pub editor_focused: bool,
    pub validity_message: Option<String>,
    /// Delegated listeners currently attached
    pub listeners: usize,
    /// Number of full renders applied
    pub full_renders: usize,
}

impl DomMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cards(&self) -> bool {
        self.layout == Layout::Cards
    }

    pub fn row(&self, key: &RowKey) -> Option<&MirrorRow> {
        self.rows.iter().find(|r| &r.key == key)
    }

    /// Row keys in DOM order
    pub fn row_keys(&self) -> Vec<RowKey> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }

    /// Number of detail panels in the DOM
    pub fn details_count(&self) -> usize {
        self.rows.iter().filter(|r| r.details.is_some()).count()
    }

    /// Text/markup of a cell
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellContent> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Serialise the current state back to markup
    pub fn to_html(&self) -> String {
        let mut out = match self.layout {
            Layout::Table => {
                let mut out = String::from("<table class=\"data-grid\">");
                out.push_str(&header_html(&self.header));
                out.push_str("<tbody>");
                for row in &self.rows {
                    let rendered = RenderedRow {
                        key: row.key.clone(),
                        index: row.data_row,
                        cells: row.cells.clone(),
                        selected: row.selected,
                    };
                    out.push_str(&row_html(&rendered, &self.header));
                    if let Some(inner) = &row.details {
                        out.push_str(&details_html(row.key.as_str(), self.header.len(), inner));
                    }
                }
                if let Some(message) = &self.empty_message {
                    out.push_str(&empty_html(self.header.len(), message));
                }
                out.push_str("</tbody></table>");
                out
            }
            Layout::Cards => {
                let mut out = String::from("<div class=\"data-grid-cards\">");
                for card in &self.cards {
                    out.push_str(&card_html(card));
                }
                out.push_str("</div>");
                out
            }
        };
        if let Some(editor) = &self.editor {
            out.push_str(&editor_html(editor));
        }
        out
    }

    fn load_view(&mut self, view: &View) {
        self.full_renders += 1;
        self.focused = None;
        match view {
            View::Table {
                header,
                rows,
                details,
                empty_message,
            } => {
                self.layout = Layout::Table;
                self.header = header.clone();
                self.cards.clear();
                self.rows = rows
                    .iter()
                    .map(|r| MirrorRow {
                        key: r.key.clone(),
                        data_row: r.index,
                        cells: r.cells.clone(),
                        selected: r.selected,
                        details: details
                            .iter()
                            .find(|(k, _)| *k == r.key)
                            .map(|(_, html)| html.clone()),
                    })
                    .collect();
                self.empty_message = empty_message.clone();
            }
            View::Cards {
                cards,
                empty_message,
            } => {
                self.layout = Layout::Cards;
                self.header.clear();
                self.rows.clear();
                self.cards = cards.clone();
                self.empty_message = empty_message.clone();
            }
        }
    }
}

impl RenderSink for DomMirror {
    fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::DetachListeners => self.listeners = 0,
            Patch::AttachListeners => self.listeners += 4,
            Patch::Render(view) => self.load_view(view),
            Patch::AppendRow(row) => self.rows.push(MirrorRow {
                key: row.key.clone(),
                data_row: row.index,
                cells: row.cells.clone(),
                selected: row.selected,
                details: None,
            }),
            Patch::RemoveRow(key) => self.rows.retain(|r| &r.key != key),
            Patch::ReindexRows => {
                for (i, row) in self.rows.iter_mut().enumerate() {
                    row.data_row = i;
                }
            }
            Patch::UpdateCell { key, col, content } => {
                if let Some(cell) = self
                    .rows
                    .iter_mut()
                    .find(|r| &r.key == key)
                    .and_then(|r| r.cells.get_mut(*col))
                {
                    *cell = content.clone();
                }
            }
            Patch::ShowDetails { key, html } => {
                if let Some(row) = self.rows.iter_mut().find(|r| &r.key == key) {
                    row.details = Some(html.clone());
                }
            }
            Patch::HideDetails(key) => {
                if let Some(row) = self.rows.iter_mut().find(|r| &r.key == key) {
                    row.details = None;
                }
            }
            Patch::ShowEmpty(message) => self.empty_message = Some(message.clone()),
            Patch::HideEmpty => self.empty_message = None,
            Patch::SelectRow { key, selected } => {
                if let Some(row) = self.rows.iter_mut().find(|r| &r.key == key) {
                    row.selected = *selected;
                }
            }
            Patch::OpenEditor(overlay) => {
                self.editor = Some(overlay.clone());
                self.editor_focused = true;
                self.validity_message = None;
            }
            Patch::CloseEditor => {
                self.editor = None;
                self.editor_focused = false;
                self.validity_message = None;
            }
            Patch::ReportValidity(message) => self.validity_message = Some(message.clone()),
            Patch::FocusCell(pos) => {
                self.focused = Some(*pos);
                self.editor_focused = false;
            }
            Patch::FocusEditor => self.editor_focused = self.editor.is_some(),
        }
    }
}
