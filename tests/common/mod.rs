//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use datagrid::{ColumnDef, ColumnType, DataGrid, HeadlessHost, Row, SetDataOptions};
use serde_json::{json, Value};

/// `name` (text) and `qty` (number), both editable
pub fn order_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name").with_label("Name").editable(),
        ColumnDef::new("qty")
            .with_label("Qty")
            .with_type(ColumnType::Number)
            .editable(),
    ]
}

/// A row keyed by `id`
pub fn row(id: i64, name: &str, qty: Value) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), json!(id));
    row.insert("name".into(), json!(name));
    row.insert("qty".into(), qty);
    row
}

/// `count` rows with ids 1..=count
pub fn rows(count: i64) -> Vec<Row> {
    (1..=count)
        .map(|id| row(id, &format!("Item {id}"), json!(id * 10)))
        .collect()
}

/// A mounted grid with the given columns and rows
pub fn host_with(columns: Vec<ColumnDef>, data: Vec<Row>) -> HeadlessHost {
    let mut grid = DataGrid::new();
    grid.set_columns(columns);
    grid.set_data(data, SetDataOptions::default());
    HeadlessHost::new(grid)
}

/// The single-row order grid: `{id: 1, name: "A", qty: "5"}`
pub fn order_host() -> HeadlessHost {
    host_with(order_columns(), vec![row(1, "A", json!("5"))])
}

/// Every DOM row sits at its data position and carries that row's key
pub fn assert_dom_in_sync(host: &HeadlessHost) {
    assert_eq!(
        host.dom.rows.len(),
        host.grid.row_count(),
        "DOM has {} rows, data has {}",
        host.dom.rows.len(),
        host.grid.row_count()
    );
    for (i, dom_row) in host.dom.rows.iter().enumerate() {
        assert_eq!(dom_row.data_row, i, "data-row of DOM row {i}");
        assert_eq!(dom_row.key, host.grid.row_key_at(i), "key of DOM row {i}");
    }
}

/// At most one editor overlay, and it matches the grid's editor
pub fn assert_single_editor(host: &HeadlessHost) {
    let html = host.dom.to_html();
    assert!(
        html.matches("class=\"cell-editor\"").count() <= 1,
        "more than one editor in {html}"
    );
    assert_eq!(
        host.dom.editor.as_ref().map(|e| e.position),
        host.grid.editor().map(|e| e.position)
    );
}
