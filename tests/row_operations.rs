//! Grid controller tests: data replacement, incremental row patches,
//! detail panels, selection and modes

mod common;

use common::{assert_dom_in_sync, host_with, order_columns, order_host, row, rows};
use datagrid::keys::KeyCode;
use datagrid::{
    CellContent, ColumnDef, ColumnType, Component, DetailsTemplate, GridEvent, GridMode, RowKey,
    SetDataOptions,
};
use serde_json::json;

// ========================================================================
// Incremental patches
// ========================================================================

#[test]
fn test_add_and_delete_keep_data_row_in_sync() {
    let mut host = host_with(order_columns(), rows(3));
    let renders = host.dom.full_renders;

    host.with_grid(|g| g.delete_row(&RowKey::from(2)));
    assert_dom_in_sync(&host);
    host.with_grid(|g| g.add_row(row(4, "D", json!(4))));
    assert_dom_in_sync(&host);
    host.with_grid(|g| g.delete_row(&RowKey::from(1)));
    assert_dom_in_sync(&host);
    host.with_grid(|g| g.add_row(row(5, "E", json!(5))));
    host.with_grid(|g| g.delete_row(&RowKey::from(5)));
    assert_dom_in_sync(&host);

    let keys: Vec<String> = host.dom.row_keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["3", "4"]);
    // All of that without a full render
    assert_eq!(host.dom.full_renders, renders);
}

#[test]
fn test_add_row_to_empty_grid_hides_empty_state() {
    let mut host = host_with(order_columns(), vec![]);
    assert_eq!(host.dom.empty_message.as_deref(), Some("No data"));

    host.with_grid(|g| g.add_row(row(1, "A", json!(1))));
    assert_eq!(host.dom.empty_message, None);
    assert_eq!(host.events_named("row-created").len(), 1);
}

#[test]
fn test_update_row_patches_cells_and_open_details() {
    let mut host = order_host();
    host.with_grid(|g| {
        g.set_details_template("<p>{{name}} x {{qty}}</p>");
        g.toggle_row_details(&RowKey::from(1));
    });
    let renders = host.dom.full_renders;

    let mut updates = datagrid::Row::new();
    updates.insert("qty".into(), json!(12000));
    host.with_grid(|g| g.update_row(&RowKey::from(1), updates));

    assert_eq!(host.dom.cell(0, 1), Some(&CellContent::Escaped("12,000".into())));
    assert_eq!(
        host.dom.row(&RowKey::from(1)).and_then(|r| r.details.clone()),
        Some("<p>A x 12000</p>".to_string())
    );
    assert_eq!(host.dom.full_renders, renders);
}

#[test]
fn test_keyless_rows_keep_their_keys_across_deletes() {
    let keyless = |name: &str| {
        let mut row = datagrid::Row::new();
        row.insert("name".into(), json!(name));
        row.insert("qty".into(), json!(1));
        row
    };
    let mut host = host_with(order_columns(), vec![keyless("A"), keyless("B"), keyless("C")]);
    let first = host.grid.row_key_at(0);
    let second = host.grid.row_key_at(1);
    assert_ne!(first, second);

    host.with_grid(|g| g.delete_row(&first));
    assert_eq!(host.grid.row_key_at(0), second);
    assert_dom_in_sync(&host);

    let mut updates = datagrid::Row::new();
    updates.insert("name".into(), json!("Z"));
    host.with_grid(|g| g.update_row(&second, updates));

    assert_eq!(host.grid.data()[0]["name"], json!("Z"));
    assert_eq!(host.dom.cell(0, 0), Some(&CellContent::Escaped("Z".into())));
    assert_eq!(host.dom.cell(1, 0), Some(&CellContent::Escaped("C".into())));
    assert_dom_in_sync(&host);
}

#[test]
fn test_update_row_changing_identity_moves_state() {
    let mut host = order_host();
    host.with_grid(|g| {
        g.set_details_template("<p>{{id}}</p>");
        g.toggle_row_details(&RowKey::from(1));
    });

    let mut updates = datagrid::Row::new();
    updates.insert("id".into(), json!(7));
    host.with_grid(|g| g.update_row(&RowKey::from(1), updates));

    assert!(host.grid.is_expanded(&RowKey::from(7)));
    assert!(host.dom.row(&RowKey::from(7)).is_some_and(|r| r.details.is_some()));
    assert_dom_in_sync(&host);
}

// ========================================================================
// set_data
// ========================================================================

#[test]
fn test_set_data_without_preserve_commits_and_renders() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("Z");

    let renders = host.dom.full_renders;
    host.with_grid(|g| {
        g.set_data(
            vec![row(1, "A", json!(5)), row(2, "B", json!(6))],
            SetDataOptions {
                preserve_focus: false,
            },
        )
    });

    assert!(!host.grid.is_editing());
    assert!(host.dom.editor.is_none());
    assert!(host.dom.full_renders > renders);
    assert!(host.dom.row(&RowKey::from(2)).is_some());
    assert_eq!(host.grid.data()[0]["name"], json!("AZ"));
    assert_eq!(host.events_named("cell-blur").len(), 1);
    assert_dom_in_sync(&host);
}

#[test]
fn test_set_data_while_editing_waits_for_editor() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("Z");

    host.with_grid(|g| g.set_data(rows(3), SetDataOptions::default()));
    assert!(host.grid.is_editing());
    assert_eq!(host.dom.rows.len(), 1);

    host.key(KeyCode::Escape);
    assert_eq!(host.dom.rows.len(), 3);
    assert_dom_in_sync(&host);
    assert_eq!(host.grid.data()[0]["name"], json!("Item 1"));
}

#[test]
fn test_set_data_keeps_focus_on_same_row() {
    let mut host = host_with(order_columns(), rows(3));
    host.click(2, 1);

    // Row 3 moves to the top
    let mut reordered = rows(3);
    reordered.rotate_right(1);
    host.with_grid(|g| g.set_data(reordered, SetDataOptions::default()));

    assert_eq!(host.dom.focused, Some(datagrid::CellPosition::new(0, 1)));
    assert_eq!(host.grid.active_cell().map(|c| c.key), Some(RowKey::from(3)));
}

#[test]
fn test_tab_after_reorder_mid_edit_follows_edited_row() {
    let mut host = host_with(order_columns(), rows(2));
    host.double_click(0, 0);

    let mut reordered = rows(2);
    reordered.reverse();
    host.with_grid(|g| g.set_data(reordered, SetDataOptions::default()));
    host.type_text("x");
    host.key(KeyCode::Tab);

    assert_eq!(host.grid.data()[1]["name"], json!("Item 1x"));
    let active = host.grid.active_cell().expect("active cell");
    assert_eq!(active.key, RowKey::from(1));
    assert_eq!((active.row, active.field.as_str()), (1, "qty"));
    assert_eq!(host.dom.focused, Some(datagrid::CellPosition::new(1, 1)));
    assert_dom_in_sync(&host);
}

#[test]
fn test_escape_after_reorder_mid_edit_focuses_edited_row() {
    let mut host = host_with(order_columns(), rows(2));
    host.double_click(0, 0);

    let mut reordered = rows(2);
    reordered.reverse();
    host.with_grid(|g| g.set_data(reordered, SetDataOptions::default()));
    host.type_text("x");
    host.key(KeyCode::Escape);

    assert_eq!(host.grid.data()[1]["name"], json!("Item 1"));
    assert_eq!(host.grid.active_cell().map(|c| c.key), Some(RowKey::from(1)));
    assert_eq!(host.dom.focused, Some(datagrid::CellPosition::new(1, 0)));
}

#[test]
fn test_set_data_prunes_expansion() {
    let mut host = host_with(order_columns(), rows(2));
    host.with_grid(|g| {
        g.set_details_template("x");
        g.toggle_row_details(&RowKey::from(2));
    });
    host.with_grid(|g| g.set_data(rows(1), SetDataOptions::default()));
    assert!(!host.grid.is_expanded(&RowKey::from(2)));

    host.with_grid(|g| g.set_data(rows(2), SetDataOptions::default()));
    assert_eq!(host.dom.details_count(), 0);
}

#[test]
fn test_get_data_is_a_copy() {
    let host = order_host();
    let mut copy = host.grid.get_data();
    copy[0].insert("name".into(), json!("changed"));
    assert_eq!(host.grid.data()[0]["name"], json!("A"));
}

// ========================================================================
// Detail panels
// ========================================================================

#[test]
fn test_toggle_details_twice_is_identity() {
    let mut host = host_with(order_columns(), rows(2));
    host.with_grid(|g| g.set_details_template(DetailsTemplate::function(|row| format!("<em>{}</em>", row["name"]))));
    let before = host.dom.to_html();

    assert!(host.with_grid(|g| g.toggle_row_details(&RowKey::from(1))));
    assert_eq!(host.dom.details_count(), 1);
    assert!(!host.with_grid(|g| g.toggle_row_details(&RowKey::from(1))));

    assert_eq!(host.dom.details_count(), 0);
    assert_eq!(host.dom.to_html(), before);
}

#[test]
fn test_toggle_without_template_is_noop() {
    let mut host = order_host();
    assert!(!host.with_grid(|g| g.toggle_row_details(&RowKey::from(1))));
    assert!(!host.grid.is_expanded(&RowKey::from(1)));
}

#[test]
fn test_details_html_template_escapes_values() {
    let mut data = row(1, "<script>", json!(1));
    data.insert("note".into(), json!("a & b"));
    let mut host = host_with(order_columns(), vec![data]);
    host.with_grid(|g| {
        g.set_details_template("<div>{{name}} / {{note}}</div>");
        g.toggle_row_details(&RowKey::from(1));
    });
    assert_eq!(
        host.dom.row(&RowKey::from(1)).and_then(|r| r.details.clone()),
        Some("<div>&lt;script&gt; / a &amp; b</div>".to_string())
    );
}

// ========================================================================
// Selection, events and rendering
// ========================================================================

#[test]
fn test_row_select_on_non_editable_cells_only() {
    let columns = vec![ColumnDef::new("id"), ColumnDef::new("name").editable()];
    let mut host = host_with(columns, rows(2));
    host.with_grid(|g| g.on_attribute_change("selectable", None, Some("")));

    host.click(1, 1);
    assert!(host.events_named("row-select").is_empty());

    host.click(1, 0);
    host.click(0, 0);
    host.click(0, 0);

    let selections: Vec<(String, bool)> = host
        .events_named("row-select")
        .into_iter()
        .filter_map(|e| match e {
            GridEvent::RowSelect { key, selected, .. } => Some((key.clone(), *selected)),
            _ => None,
        })
        .collect();
    assert_eq!(
        selections,
        vec![("2".into(), true), ("1".into(), true), ("1".into(), false)]
    );
    assert!(host.dom.rows.iter().all(|r| !r.selected));
    assert_eq!(host.events_named("cell-click").len(), 4);
}

#[test]
fn test_raw_columns_are_not_escaped() {
    let columns = vec![
        ColumnDef::new("name"),
        ColumnDef::new("actions").with_type(ColumnType::Html),
        ColumnDef::new("qty").with_format(|value, _row| format!("<b>{}</b>", value)),
    ];
    let mut data = row(1, "<i>A</i>", json!(3));
    data.insert("actions".into(), json!("<button>Go</button>"));
    let host = host_with(columns, vec![data]);

    let html = host.dom.to_html();
    assert!(html.contains("&lt;i&gt;A&lt;/i&gt;"));
    assert!(html.contains("<button>Go</button>"));
    assert!(html.contains("<b>3</b>"));
}

#[test]
fn test_listener_count_constant_across_renders() {
    let mut host = host_with(order_columns(), rows(2));
    for _ in 0..3 {
        host.with_grid(|g| {
            g.set_columns(order_columns());
            g.set_data(rows(4), SetDataOptions::default());
            g.set_mode(GridMode::Cards);
            g.set_mode(GridMode::Spreadsheet);
        });
    }
    assert_eq!(host.dom.listeners, 4);
}

#[test]
fn test_cards_mode_renders_template() {
    let mut host = host_with(order_columns(), rows(2));
    host.with_grid(|g| {
        g.on_attribute_change("mode", None, Some("cards"));
        g.set_card_template(|row, index| format!("<p>#{index} {}</p>", row["name"].as_str().unwrap_or("")));
    });

    assert!(host.dom.is_cards());
    assert_eq!(host.dom.cards.len(), 2);
    assert_eq!(host.dom.cards[1].html, "<p>#1 Item 2</p>");

    host.with_grid(|g| g.add_row(row(3, "C", json!(3))));
    assert_eq!(host.dom.cards.len(), 3);
}

#[test]
fn test_cards_mode_default_card() {
    let mut host = host_with(order_columns(), vec![row(1, "Widget", json!(2500))]);
    host.with_grid(|g| g.set_mode(GridMode::Cards));
    let html = host.dom.to_html();
    assert!(html.contains("Widget"));
    assert!(html.contains("<dt>Qty</dt><dd>2,500</dd>"));
}

#[test]
fn test_focus_api_and_saved_focus() {
    let mut host = host_with(order_columns(), rows(3));
    assert!(!host.with_grid(|g| g.focus_cell(10, 0, true)));

    assert!(host.with_grid(|g| g.focus_cell(1, 1, false)));
    let active = host.grid.active_cell().expect("active cell");
    assert_eq!((active.row, active.col, active.field.as_str()), (1, 1, "qty"));

    host.with_grid(|g| g.save_focus());
    host.click(0, 0);
    assert!(host.with_grid(|g| g.restore_focus()));
    assert_eq!(host.dom.focused, Some(datagrid::CellPosition::new(1, 1)));

    assert!(host.with_grid(|g| g.focus_cell(2, 0, true)));
    assert!(host.grid.is_editing());
}

#[test]
fn test_unmount_commits_and_detaches() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("!");
    host.with_grid(|g| g.on_unmount());

    assert_eq!(host.dom.listeners, 0);
    assert!(!host.grid.is_editing());
    assert_eq!(host.grid.data()[0]["name"], json!("A!"));
}
