//! Numeric parsing as seen through committed edits

mod common;

use common::{host_with, row};
use datagrid::keys::{KeyCode, Modifiers};
use datagrid::numeric::{number_value, parse_numeric};
use datagrid::{ColumnDef, ColumnType};
use serde_json::{json, Value};

// ========================================================================
// parse_numeric
// ========================================================================

#[test]
fn test_parse_numeric_table() {
    let cases: &[(&str, f64)] = &[
        ("1.234,56", 1234.56),
        ("1,234.56", 1234.56),
        ("1234,56", 1234.56),
        ("1,5", 1.5),
        ("$ 1,234", 1234.0),
        ("$1,234.00", 1234.0),
        ("1,000", 1000.0),
        ("1,000,000", 1_000_000.0),
        ("1.000.000,5", 1_000_000.5),
        ("  42  ", 42.0),
        ("-12,5", -12.5),
        ("abc", 0.0),
        ("", 0.0),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_numeric(input), *expected, "input {input:?}");
    }
}

#[test]
fn test_number_value_shape() {
    assert_eq!(number_value(parse_numeric("1,000")), json!(1000));
    assert_eq!(number_value(parse_numeric("1.234,56")), json!(1234.56));
    assert_eq!(number_value(parse_numeric("x")), json!(0));
}

// ========================================================================
// Through the editor
// ========================================================================

fn commit_typed(column: ColumnDef, text: &str) -> Value {
    let mut host = host_with(vec![column], vec![row(1, "A", json!(0))]);
    host.double_click(0, 0);
    host.press(KeyCode::Char('a'), Modifiers::CTRL);
    host.type_text(text);
    host.key(KeyCode::Enter);
    assert!(!host.grid.is_editing());
    host.grid.data()[0]["qty"].clone()
}

#[test]
fn test_number_column_commits_parsed_value() {
    let qty = || ColumnDef::new("qty").with_type(ColumnType::Number).editable();
    assert_eq!(commit_typed(qty(), "1.234,56"), json!(1234.56));
    assert_eq!(commit_typed(qty(), "2,5"), json!(2.5));
    assert_eq!(commit_typed(qty(), "lots"), json!(0));
}

#[test]
fn test_currency_column_commits_and_reformats() {
    let price = ColumnDef::new("qty").with_type(ColumnType::Currency).editable();
    let mut host = host_with(vec![price], vec![row(1, "A", json!(10))]);
    host.double_click(0, 0);
    host.press(KeyCode::Char('a'), Modifiers::CTRL);
    host.type_text("$ 2,499.60");
    host.key(KeyCode::Enter);

    assert_eq!(host.grid.data()[0]["qty"], json!(2499.6));
    assert_eq!(
        host.dom.cell(0, 0).map(|c| c.as_str().to_string()),
        Some("$2,500".to_string())
    );
}

#[test]
fn test_text_column_is_not_parsed() {
    let text = ColumnDef::new("qty").editable();
    assert_eq!(commit_typed(text, "1,000"), json!("1,000"));
}
