//! Logging setup and debug diagnostics
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=grid=debug,message=debug` - state diffs and dispatched messages
//! - `RUST_LOG=datagrid::update=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/datagrid/logs/datagrid.log` with daily
//! rotation. File logging uses debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::grid::DataGrid;
use crate::navigation::CellPosition;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// the config directory's `logs/` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so `datagrid render` output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "datagrid.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of focus/editor state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub rows: usize,
    pub active: Option<CellPosition>,
    /// Position and generation of the open editor
    pub editor: Option<(CellPosition, u64)>,
}

impl GridSnapshot {
    pub fn from_grid(grid: &DataGrid) -> Self {
        Self {
            rows: grid.row_count(),
            active: grid.active,
            editor: grid.editor().map(|e| (e.position, e.generation)),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &GridSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.rows != other.rows {
            changes.push(format!("rows: {} → {}", self.rows, other.rows));
        }
        if self.active != other.active {
            changes.push(format!(
                "active: {} → {}",
                describe(self.active),
                describe(other.active)
            ));
        }
        if self.editor != other.editor {
            let fmt_editor = |e: Option<(CellPosition, u64)>| match e {
                Some((pos, generation)) => format!("#{} at {}", generation, describe(Some(pos))),
                None => "closed".to_string(),
            };
            changes.push(format!(
                "editor: {} → {}",
                fmt_editor(self.editor),
                fmt_editor(other.editor)
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe(pos: Option<CellPosition>) -> String {
    match pos {
        Some(p) => format!("({},{})", p.row, p.col),
        None => "none".to_string(),
    }
}
