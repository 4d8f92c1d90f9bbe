//! Command-line interface
//!
//! Supports:
//! - Rendering rows (JSON or CSV) through a grid to HTML
//! - Checking how the cell editor parses numeric input

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::column::{parse_columns, ColumnDef};
use crate::config::GridConfig;
use crate::csv_import;
use crate::grid::{DataGrid, GridMode, SetDataOptions};
use crate::host::HeadlessHost;
use crate::numeric::{number_value, parse_numeric};
use crate::row::{Row, RowKey};
use crate::templates::DetailsTemplate;

/// Headless editable data grid
#[derive(Parser, Debug)]
#[command(name = "datagrid", version, about = "Render and inspect editable data grids")]
pub struct CliArgs {
    /// Config file (default: ~/.config/datagrid/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render rows to HTML on stdout
    Render {
        /// Rows: a JSON array of objects, or a CSV/TSV/PSV file
        #[arg(value_name = "ROWS")]
        rows: PathBuf,

        /// Column definitions (YAML or JSON). Defaults to the first row's fields.
        #[arg(short, long, value_name = "PATH")]
        columns: Option<PathBuf>,

        /// spreadsheet or cards
        #[arg(short, long)]
        mode: Option<GridMode>,

        /// Identity field
        #[arg(long, value_name = "FIELD")]
        row_key: Option<String>,

        /// Detail panel markup with {{field}} placeholders
        #[arg(long, value_name = "HTML")]
        details: Option<String>,

        /// Row keys whose detail panel is open (repeatable)
        #[arg(long, value_name = "KEY")]
        expand: Vec<String>,
    },
    /// Parse values the way a numeric cell editor does
    ParseNumber {
        #[arg(value_name = "INPUT")]
        inputs: Vec<String>,
    },
}

impl CliArgs {
    /// The config named on the command line, or the user's config
    pub fn load_config(&self) -> anyhow::Result<GridConfig> {
        match &self.config {
            Some(path) => GridConfig::load_from(path),
            None => Ok(GridConfig::load()),
        }
    }
}

/// Options of the `render` subcommand
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub columns: Option<PathBuf>,
    pub mode: Option<GridMode>,
    pub row_key: Option<String>,
    pub details: Option<String>,
    pub expand: Vec<String>,
}

/// Load rows from JSON (by extension) or delimited text
pub fn load_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of objects", path.display()))
    } else {
        Ok(csv_import::import_file(path)?)
    }
}

/// Columns from a definitions file, or one text column per field of the
/// first row
pub fn load_columns(path: Option<&Path>, rows: &[Row]) -> anyhow::Result<Vec<ColumnDef>> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_columns(&source).with_context(|| format!("Invalid columns in {}", path.display()))
        }
        None => Ok(rows
            .first()
            .map(|row| row.keys().map(ColumnDef::new).collect())
            .unwrap_or_default()),
    }
}

/// Run `render`: returns the grid's markup
pub fn render(config: &GridConfig, rows_path: &Path, options: &RenderOptions) -> anyhow::Result<String> {
    let rows = load_rows(rows_path)?;
    let columns = load_columns(options.columns.as_deref(), &rows)?;
    tracing::info!(rows = rows.len(), columns = columns.len(), "rendering");

    let mut grid = DataGrid::with_config(config);
    if let Some(field) = &options.row_key {
        grid.set_row_key_field(field.as_str());
    }
    if let Some(mode) = options.mode {
        grid.set_mode(mode);
    }
    grid.set_columns(columns);
    grid.set_data(rows, SetDataOptions::default());
    if let Some(details) = &options.details {
        grid.set_details_template(DetailsTemplate::Html(details.clone()));
    }

    let mut host = HeadlessHost::new(grid);
    host.with_grid(|grid| {
        for key in &options.expand {
            if !grid.toggle_row_details(&RowKey::new(key.as_str())) {
                tracing::warn!(key = %key, "could not expand row");
            }
        }
    });
    Ok(host.dom.to_html())
}

/// Run `parse-number`: one `input => value` line per input
pub fn parse_numbers(inputs: &[String]) -> String {
    inputs
        .iter()
        .map(|input| format!("{:?} => {}\n", input, number_value(parse_numeric(input))))
        .collect()
}
