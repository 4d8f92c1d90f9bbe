//! CSV import using the csv crate
//!
//! Loads delimited text into grid rows: the header record names the fields,
//! every following record becomes one row with string values. Ragged
//! records are padded with empty strings; extra fields are dropped.

use std::io::Cursor;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::row::Row;

/// Field separator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Delimiter implied by a file extension, if any
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV parse error at record {record}: {source}")]
    Parse {
        record: usize,
        #[source]
        source: csv::Error,
    },
    #[error("CSV input has no header record")]
    MissingHeader,
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Detect delimiter by analyzing first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 {
        return Delimiter::Comma;
    }

    if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else if semi_count == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Parse delimited text into rows keyed by the header record
pub fn parse_rows(content: &str, delimiter: Delimiter) -> Result<Vec<Row>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.char() as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let mut records = reader.records();
    let header = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(source)) => return Err(ImportError::Parse { record: 1, source }),
        None => return Err(ImportError::MissingHeader),
    };
    let fields: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, name)| match name.trim() {
            "" => format!("column_{}", i + 1),
            name => name.to_string(),
        })
        .collect();

    let mut rows = Vec::new();
    for (i, result) in records.enumerate() {
        let record = result.map_err(|source| ImportError::Parse {
            record: i + 2,
            source,
        })?;
        if record.len() > fields.len() {
            tracing::debug!(record = i + 2, extra = record.len() - fields.len(), "dropping extra fields");
        }
        let row: Row = fields
            .iter()
            .enumerate()
            .map(|(col, field)| {
                let value = record.get(col).unwrap_or_default();
                (field.clone(), Value::String(value.to_string()))
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = fields.len(), ?delimiter, "parsed csv");
    Ok(rows)
}

/// Read a delimited file, choosing the delimiter from the extension or,
/// failing that, the content
pub fn import_file(path: &Path) -> Result<Vec<Row>, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let delimiter = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Delimiter::from_extension)
        .unwrap_or_else(|| detect_delimiter(&content));
    parse_rows(&content, delimiter)
}
