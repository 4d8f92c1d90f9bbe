//! Cell value formatting
//!
//! | type      | output                                          |
//! |-----------|-------------------------------------------------|
//! | number    | grouped thousands, up to 3 fraction digits      |
//! | currency  | symbol + grouped, rounded integer               |
//! | date      | `M/D/YYYY`; unparseable values pass through     |
//! | badge     | coloured pill, label escaped                    |
//! | action    | raw markup                                      |
//! | html      | raw markup                                      |
//! | text      | escaped                                         |
//!
//! A column `format` closure wins over the type and is inserted raw.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::{escape_html, CellContent};
use crate::column::{ColumnDef, ColumnType};
use crate::numeric::coerce_number;
use crate::row::{value_text, Row};

/// Presentation settings shared by every cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub currency_symbol: String,
    pub default_badge_color: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            default_badge_color: "#6b7280".to_string(),
        }
    }
}

/// Render `value` of `row` for `column`
pub fn format_cell(
    column: &ColumnDef,
    value: &Value,
    row: &Row,
    opts: &FormatOptions,
) -> CellContent {
    if let Some(format) = &column.format {
        return CellContent::Raw(format(value, row));
    }

    match column.column_type {
        ColumnType::Number => match coerce_number(value) {
            Some(n) => CellContent::Escaped(format_number(n, 3)),
            None => CellContent::Escaped(value_text(value)),
        },
        ColumnType::Currency => match coerce_number(value) {
            Some(n) => CellContent::Escaped(format!(
                "{}{}",
                opts.currency_symbol,
                format_number(n.round(), 0)
            )),
            None => CellContent::Escaped(value_text(value)),
        },
        ColumnType::Date => CellContent::Escaped(format_date(value)),
        ColumnType::Badge => {
            let label = value_text(value);
            let color = column
                .badge
                .get(&label)
                .unwrap_or(&opts.default_badge_color);
            CellContent::Raw(format!(
                "<span class=\"badge\" style=\"background-color: {}\">{}</span>",
                escape_html(color),
                escape_html(&label)
            ))
        }
        ColumnType::Action | ColumnType::Html => CellContent::Raw(value_text(value)),
        ColumnType::Text => CellContent::Escaped(value_text(value)),
    }
}

/// en-US grouping with at most `max_fraction` fraction digits
pub fn format_number(n: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, n.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (fixed, String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if n.is_sign_negative() && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// `M/D/YYYY`, or the raw text when it is not a recognisable date
fn format_date(value: &Value) -> String {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    };

    match parsed {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => value_text(value),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}
