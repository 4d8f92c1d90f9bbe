//! Editor overlay tests
//!
//! Opening, committing, cancelling and validating cell edits.

mod common;

use std::time::Duration;

use common::{assert_single_editor, host_with, order_columns, order_host, row};
use datagrid::keys::{KeyCode, Modifiers};
use datagrid::{CellContent, CellPosition, ColumnDef, GridEvent, GridMsg, Validation};
use serde_json::json;

// ========================================================================
// Commit
// ========================================================================

#[test]
fn test_qty_commit_with_tab_parses_and_keeps_focus() {
    let mut host = order_host();

    host.double_click(0, 1);
    assert!(host.grid.is_editing());
    assert_eq!(host.dom.editor.as_ref().map(|e| e.value.as_str()), Some("5"));

    host.press(KeyCode::Char('a'), Modifiers::CTRL);
    host.type_text("1,000");
    host.key(KeyCode::Tab);

    assert_eq!(host.grid.get_data()[0]["qty"], json!(1000));
    assert!(!host.grid.is_editing());
    assert!(host.dom.editor.is_none());
    // No editable cell after qty and no next row: focus stays put
    assert_eq!(host.dom.focused, Some(CellPosition::new(0, 1)));
    assert_eq!(
        host.dom.cell(0, 1),
        Some(&CellContent::Escaped("1,000".into()))
    );
}

#[test]
fn test_commit_emits_cell_blur_with_old_and_new_value() {
    let mut host = order_host();
    host.double_click(0, 1);
    host.send(GridMsg::EditorInput {
        value: "1.234,56".into(),
        cursor: None,
    });
    host.key(KeyCode::Enter);

    let blurs = host.events_named("cell-blur");
    assert_eq!(blurs.len(), 1);
    match blurs[0] {
        GridEvent::CellBlur {
            old_value, value, field, ..
        } => {
            assert_eq!(old_value, &json!("5"));
            assert_eq!(value, &json!(1234.56));
            assert_eq!(field, "qty");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_unchanged_commit_emits_no_cell_blur() {
    let mut host = host_with(order_columns(), vec![row(1, "A", json!(5))]);
    host.double_click(0, 1);
    host.key(KeyCode::Enter);
    assert!(host.events_named("cell-blur").is_empty());
    assert_eq!(host.grid.data()[0]["qty"], json!(5));
}

#[test]
fn test_every_keystroke_emits_cell_change() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("bc");
    host.key(KeyCode::Backspace);

    let values: Vec<String> = host
        .events_named("cell-change")
        .into_iter()
        .filter_map(|e| match e {
            GridEvent::CellChange { value, .. } => Some(value.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec!["Ab", "Abc", "Ab"]);
    // Nothing committed yet
    assert_eq!(host.grid.data()[0]["name"], json!("A"));
}

#[test]
fn test_typing_on_selected_cell_starts_editing() {
    let mut host = order_host();
    host.click(0, 0);
    host.type_text("Zed");
    assert_eq!(host.grid.editor().map(|e| e.value()), Some("Zed"));
    host.key(KeyCode::Enter);
    assert_eq!(host.grid.data()[0]["name"], json!("Zed"));
}

// ========================================================================
// Cancel
// ========================================================================

#[test]
fn test_escape_restores_without_mutation() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("xyz");
    host.key(KeyCode::Escape);

    assert!(!host.grid.is_editing());
    assert_eq!(host.grid.data()[0]["name"], json!("A"));
    assert_eq!(host.dom.cell(0, 0), Some(&CellContent::Escaped("A".into())));
    assert!(host.events_named("cell-blur").is_empty());
    assert_eq!(host.dom.focused, Some(CellPosition::new(0, 0)));
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_invalid_value_blocks_commit() {
    let columns = vec![ColumnDef::new("name").editable().with_validation(Validation {
        required: true,
        ..Validation::default()
    })];
    let mut host = host_with(columns, vec![row(1, "A", json!(1))]);

    host.double_click(0, 0);
    host.press(KeyCode::Char('a'), Modifiers::CTRL);
    host.key(KeyCode::Backspace);
    host.key(KeyCode::Enter);

    assert!(host.grid.is_editing());
    assert!(host.dom.editor_focused);
    assert_eq!(
        host.dom.validity_message.as_deref(),
        Some("Please fill out this field.")
    );
    assert_eq!(host.grid.data()[0]["name"], json!("A"));

    // Tab is blocked too
    host.key(KeyCode::Tab);
    assert!(host.grid.is_editing());

    host.type_text("B");
    host.key(KeyCode::Enter);
    assert!(!host.grid.is_editing());
    assert_eq!(host.grid.data()[0]["name"], json!("B"));
}

#[test]
fn test_pattern_and_range_checks() {
    let columns = vec![
        ColumnDef::new("code").editable().with_validation(Validation {
            pattern: Some("[A-Z]{3}".into()),
            ..Validation::default()
        }),
        ColumnDef::new("qty")
            .with_type(datagrid::ColumnType::Number)
            .editable()
            .with_validation(Validation {
                max: Some(10.0),
                ..Validation::default()
            }),
    ];
    let mut data = datagrid::Row::new();
    data.insert("id".into(), json!(1));
    let mut host = host_with(columns, vec![data]);

    host.double_click(0, 0);
    host.type_text("abcd");
    host.key(KeyCode::Enter);
    assert!(host.grid.is_editing());

    host.send(GridMsg::EditorInput {
        value: "ABC".into(),
        cursor: None,
    });
    host.key(KeyCode::Enter);
    assert!(!host.grid.is_editing());

    host.double_click(0, 1);
    host.type_text("11");
    host.key(KeyCode::Enter);
    assert!(host.grid.is_editing());
    assert!(host
        .dom
        .validity_message
        .as_deref()
        .is_some_and(|m| m.contains("less than or equal to 10")));
}

// ========================================================================
// Blur and single-editor invariant
// ========================================================================

#[test]
fn test_blur_commits_after_grace_period() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("!");

    host.send(GridMsg::EditorBlur);
    assert!(host.grid.is_editing());
    host.advance(Duration::from_millis(5));
    assert!(host.grid.is_editing());
    host.advance(Duration::from_millis(5));
    assert!(!host.grid.is_editing());
    assert_eq!(host.grid.data()[0]["name"], json!("A!"));
}

#[test]
fn test_click_elsewhere_during_blur_reopens_there() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("!");

    host.send(GridMsg::EditorBlur);
    host.click(0, 1);
    host.advance(Duration::from_millis(20));

    assert_eq!(host.grid.data()[0]["name"], json!("A!"));
    assert_eq!(
        host.grid.editor().map(|e| e.position),
        Some(CellPosition::new(0, 1))
    );
    assert_single_editor(&host);
}

#[test]
fn test_at_most_one_editor_for_any_interleaving() {
    enum Step {
        DoubleClick(usize, usize),
        Key(KeyCode),
    }

    let mut host = host_with(order_columns(), common::rows(3));
    let steps = [
        Step::DoubleClick(0, 0),
        Step::DoubleClick(1, 1),
        Step::Key(KeyCode::Tab),
        Step::Key(KeyCode::Enter),
        Step::DoubleClick(2, 0),
        Step::Key(KeyCode::Escape),
        Step::Key(KeyCode::Enter),
        Step::DoubleClick(0, 1),
        Step::DoubleClick(0, 1),
        Step::Key(KeyCode::Escape),
    ];
    for step in steps {
        match step {
            Step::DoubleClick(row, col) => host.double_click(row, col),
            Step::Key(key) => host.key(key),
        }
        assert_single_editor(&host);
    }
}

// ========================================================================
// Caret-aware keys
// ========================================================================

#[test]
fn test_arrow_leaves_editor_only_at_boundary() {
    let mut host = order_host();
    host.double_click(0, 0);

    // Caret starts at the end of "A"
    host.key(KeyCode::ArrowLeft);
    assert!(host.grid.is_editing());
    host.key(KeyCode::ArrowLeft);
    assert!(!host.grid.is_editing());
    // Left from the first editable column loops to the last
    assert_eq!(host.dom.focused, Some(CellPosition::new(0, 1)));
}

#[test]
fn test_shift_enter_inserts_newline_in_multiline_column() {
    let columns = vec![ColumnDef::new("note").editable().multiline()];
    let mut data = datagrid::Row::new();
    data.insert("id".into(), json!(1));
    data.insert("note".into(), json!("a"));
    let mut host = host_with(columns, vec![data]);

    host.double_click(0, 0);
    assert!(host.dom.editor.as_ref().is_some_and(|e| e.multiline));
    host.press(KeyCode::Enter, Modifiers::SHIFT);
    host.type_text("b");
    host.key(KeyCode::Enter);
    assert_eq!(host.grid.data()[0]["note"], json!("a\nb"));
}

#[test]
fn test_undo_inside_editor() {
    let mut host = order_host();
    host.double_click(0, 0);
    host.type_text("bc");
    host.press(KeyCode::Char('z'), Modifiers::CTRL);
    assert_eq!(host.grid.editor().map(|e| e.value()), Some("Ab"));
    host.press(KeyCode::Char('y'), Modifiers::CTRL);
    assert_eq!(host.grid.editor().map(|e| e.value()), Some("Abc"));
}
