//! Where the grid keeps its config file and logs
//!
//! `$XDG_CONFIG_HOME/datagrid/` when set, otherwise the platform config
//! directory from `dirs` (`~/.config/datagrid/` on Linux).

use std::path::PathBuf;

use anyhow::Context;

const APP_DIR: &str = "datagrid";

pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|base| base.join(APP_DIR))
}

/// Grid defaults read by [`crate::GridConfig::load`]
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    std::fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create {}", logs.display()))?;
    Ok(logs)
}
