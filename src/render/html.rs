//! HTML markup for grid views
//!
//! Rows carry `data-row` (position) and `data-key` (row key); cells carry
//! `data-row`, `data-col` and `data-field` so a single delegated listener can
//! find the cell an event came from.

use super::{escape_html, CellContent, EditorOverlay, HeaderCell, RenderedCard, RenderedRow, View};
use crate::column::ColumnDef;
use crate::row::{value_text, Row};

/// `<thead>` for the given headers
pub fn header_html(header: &[HeaderCell]) -> String {
    let mut out = String::from("<thead><tr>");
    for (i, h) in header.iter().enumerate() {
        let mut style = format!("text-align: {}", h.align.as_css());
        if let Some(width) = &h.width {
            style.push_str(&format!("; width: {}", escape_html(width)));
        }
        out.push_str(&format!(
            "<th data-col=\"{}\" data-field=\"{}\" style=\"{}\">{}</th>",
            i,
            escape_html(&h.key),
            style,
            escape_html(&h.label)
        ));
    }
    out.push_str("</tr></thead>");
    out
}

/// A data row
pub fn row_html(row: &RenderedRow, header: &[HeaderCell]) -> String {
    let class = if row.selected { "grid-row selected" } else { "grid-row" };
    let mut out = format!(
        "<tr class=\"{}\" data-row=\"{}\" data-key=\"{}\">",
        class,
        row.index,
        escape_html(row.key.as_str())
    );
    for (col, cell) in row.cells.iter().enumerate() {
        out.push_str(&cell_html(row.index, col, header.get(col), cell));
    }
    out.push_str("</tr>");
    out
}

/// A single `<td>`
pub fn cell_html(row: usize, col: usize, header: Option<&HeaderCell>, content: &CellContent) -> String {
    let (field, align, editable) = match header {
        Some(h) => (escape_html(&h.key), h.align.as_css(), h.editable),
        None => (String::new(), "left", false),
    };
    let class = if editable { "grid-cell editable" } else { "grid-cell" };
    format!(
        "<td class=\"{}\" tabindex=\"-1\" data-row=\"{}\" data-col=\"{}\" data-field=\"{}\" style=\"text-align: {}\">{}</td>",
        class,
        row,
        col,
        field,
        align,
        content.to_html()
    )
}

/// The detail panel row beneath an expanded row
pub fn details_html(key: &str, colspan: usize, inner: &str) -> String {
    format!(
        "<tr class=\"grid-details\" data-details-for=\"{}\"><td colspan=\"{}\">{}</td></tr>",
        escape_html(key),
        colspan.max(1),
        inner
    )
}

/// The placeholder row shown when there is no data
pub fn empty_html(colspan: usize, message: &str) -> String {
    format!(
        "<tr class=\"grid-empty\"><td colspan=\"{}\">{}</td></tr>",
        colspan.max(1),
        escape_html(message)
    )
}

/// Default card: first column as the title, the rest as label/value pairs
pub fn default_card_html(row: &Row, columns: &[ColumnDef], cells: &[CellContent]) -> String {
    let mut out = String::from("<div class=\"grid-card-body\">");
    if let Some(title) = cells.first() {
        out.push_str(&format!("<h3 class=\"grid-card-title\">{}</h3>", title.to_html()));
    } else if let Some(first) = row.values().next() {
        out.push_str(&format!(
            "<h3 class=\"grid-card-title\">{}</h3>",
            escape_html(&value_text(first))
        ));
    }
    out.push_str("<dl>");
    for (column, cell) in columns.iter().zip(cells).skip(1) {
        out.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(&column.label),
            cell.to_html()
        ));
    }
    out.push_str("</dl></div>");
    out
}

/// Wrapper around a card's inner markup
pub fn card_html(card: &RenderedCard) -> String {
    format!(
        "<div class=\"grid-card\" data-row=\"{}\" data-key=\"{}\">{}</div>",
        card.index,
        escape_html(card.key.as_str()),
        card.html
    )
}

/// The floating editor element
pub fn editor_html(overlay: &EditorOverlay) -> String {
    let mut attrs = String::new();
    for (name, value) in &overlay.attrs {
        if value.is_empty() {
            attrs.push_str(&format!(" {}", name));
        } else {
            attrs.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
    }
    if overlay.multiline {
        format!(
            "<textarea class=\"cell-editor\" data-row=\"{}\" data-col=\"{}\"{}>{}</textarea>",
            overlay.position.row,
            overlay.position.col,
            attrs,
            escape_html(&overlay.value)
        )
    } else {
        format!(
            "<input class=\"cell-editor\" type=\"text\" data-row=\"{}\" data-col=\"{}\" value=\"{}\"{}>",
            overlay.position.row,
            overlay.position.col,
            escape_html(&overlay.value),
            attrs
        )
    }
}

/// Complete markup for a view
pub fn view_html(view: &View) -> String {
    match view {
        View::Table {
            header,
            rows,
            details,
            empty_message,
        } => {
            let mut out = String::from("<table class=\"data-grid\">");
            out.push_str(&header_html(header));
            out.push_str("<tbody>");
            for row in rows {
                out.push_str(&row_html(row, header));
                if let Some((_, inner)) = details.iter().find(|(k, _)| *k == row.key) {
                    out.push_str(&details_html(row.key.as_str(), header.len(), inner));
                }
            }
            if let Some(message) = empty_message {
                out.push_str(&empty_html(header.len(), message));
            }
            out.push_str("</tbody></table>");
            out
        }
        View::Cards {
            cards,
            empty_message,
        } => {
            let mut out = String::from("<div class=\"data-grid-cards\">");
            for card in cards {
                out.push_str(&card_html(card));
            }
            if let Some(message) = empty_message {
                out.push_str(&format!(
                    "<div class=\"grid-empty\">{}</div>",
                    escape_html(message)
                ));
            }
            out.push_str("</div>");
            out
        }
    }
}
