//! Configuration tests
//!
//! Tests for config paths, config persistence, and how a loaded config
//! shapes a grid.

mod common;

use std::time::Duration;

use common::order_columns;
use datagrid::config_paths;
use datagrid::keys::KeyCode;
use datagrid::{DataGrid, GridConfig, GridMode, HeadlessHost, SetDataOptions};
use serde_json::json;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("datagrid"));
    }
}

#[test]
fn test_config_file_is_yaml() {
    if let Some(file) = config_paths::config_file() {
        assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_inside_config_dir() {
    if let (Some(dir), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&dir));
        assert!(logs.ends_with("logs"));
    }
}

// ========================================================================
// Persistence Tests
// ========================================================================

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let config = GridConfig {
        double_press_ms: 250,
        default_mode: GridMode::Cards,
        row_key_field: "sku".into(),
        ..GridConfig::default()
    };
    config.save_to(&path).unwrap();

    let loaded = GridConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.double_press_window(), Duration::from_millis(250));
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(GridConfig::load_from(&dir.path().join("nope.yaml")).is_err());
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "{}\n").unwrap();
    assert_eq!(GridConfig::load_from(&path).unwrap(), GridConfig::default());
}

// ========================================================================
// Config applied to a grid
// ========================================================================

fn host_for(config: &GridConfig, rows: Vec<datagrid::Row>) -> HeadlessHost {
    let mut grid = DataGrid::with_config(config);
    grid.set_columns(order_columns());
    grid.set_data(rows, SetDataOptions::default());
    HeadlessHost::new(grid)
}

#[test]
fn test_double_press_window_from_config() {
    let config = GridConfig {
        double_press_ms: 100,
        ..GridConfig::default()
    };
    let mut host = host_for(&config, vec![common::row(1, "A", json!(1))]);
    host.click(0, 0);

    host.key(KeyCode::ArrowDown);
    host.advance(Duration::from_millis(200));
    host.key(KeyCode::ArrowDown);
    assert_eq!(host.grid.row_count(), 1);

    host.advance(Duration::from_millis(50));
    host.key(KeyCode::ArrowDown);
    assert_eq!(host.grid.row_count(), 2);
}

#[test]
fn test_empty_message_and_mode_from_config() {
    let config = GridConfig {
        empty_message: "Nothing to show".into(),
        default_mode: GridMode::Cards,
        ..GridConfig::default()
    };
    let host = host_for(&config, vec![]);
    assert_eq!(host.grid.mode(), GridMode::Cards);
    assert_eq!(host.dom.empty_message.as_deref(), Some("Nothing to show"));
}

#[test]
fn test_currency_symbol_from_config() {
    let config = GridConfig {
        currency_symbol: "€".into(),
        ..GridConfig::default()
    };
    let mut grid = DataGrid::with_config(&config);
    grid.set_columns(vec![datagrid::ColumnDef::new("price").with_type(datagrid::ColumnType::Currency)]);
    let mut row = datagrid::Row::new();
    row.insert("id".into(), json!(1));
    row.insert("price".into(), json!(1500));
    grid.set_data(vec![row], SetDataOptions::default());
    let host = HeadlessHost::new(grid);
    assert!(host.dom.to_html().contains("€1,500"));
}
