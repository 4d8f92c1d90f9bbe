//! Outbound grid events
//!
//! The only way the grid talks to its host page. Each variant corresponds to
//! a bubbling DOM custom event; `serde` renders the payload a browser binding
//! would put in `event.detail`.

use serde::Serialize;
use serde_json::Value;

use crate::row::{Row, RowKey};

/// Events emitted for the host to observe and persist
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GridEvent {
    /// Any cell was clicked
    CellClick {
        row: usize,
        col: usize,
        key: String,
        field: String,
        value: Value,
    },
    /// A non-editable cell was clicked on a selectable grid
    RowSelect {
        row: usize,
        key: String,
        selected: bool,
        data: Row,
    },
    /// The open editor's text changed (before commit)
    CellChange {
        row: usize,
        col: usize,
        key: String,
        field: String,
        value: String,
    },
    /// An edit was committed with a value different from the original
    CellBlur {
        row: usize,
        col: usize,
        key: String,
        field: String,
        old_value: Value,
        value: Value,
        data: Row,
    },
    RowCreated {
        row: usize,
        key: String,
        data: Row,
    },
    RowDeleted {
        row: usize,
        key: String,
        data: Row,
    },
}

impl GridEvent {
    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            GridEvent::CellClick { .. } => "cell-click",
            GridEvent::RowSelect { .. } => "row-select",
            GridEvent::CellChange { .. } => "cell-change",
            GridEvent::CellBlur { .. } => "cell-blur",
            GridEvent::RowCreated { .. } => "row-created",
            GridEvent::RowDeleted { .. } => "row-deleted",
        }
    }

    /// Key of the row the event concerns
    pub fn row_key(&self) -> RowKey {
        match self {
            GridEvent::CellClick { key, .. }
            | GridEvent::RowSelect { key, .. }
            | GridEvent::CellChange { key, .. }
            | GridEvent::CellBlur { key, .. }
            | GridEvent::RowCreated { key, .. }
            | GridEvent::RowDeleted { key, .. } => RowKey::new(key.as_str()),
        }
    }
}
