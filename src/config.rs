//! Grid configuration persistence
//!
//! Stores defaults in `~/.config/datagrid/config.yaml`

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::gesture::DOUBLE_PRESS_WINDOW;
use crate::grid::{GridMode, BLUR_COMMIT_DELAY, DEFAULT_EMPTY_MESSAGE};
use crate::render::FormatOptions;
use crate::row::DEFAULT_ROW_KEY;

/// Defaults applied to every grid created with [`crate::DataGrid::with_config`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Window for double-press gestures, in milliseconds
    pub double_press_ms: u64,
    /// Grace period between editor blur and commit, in milliseconds
    pub blur_commit_delay_ms: u64,
    pub default_mode: GridMode,
    /// Identity field used for row keys
    pub row_key_field: String,
    /// Badge colour for values without a mapping
    pub default_badge_color: String,
    pub currency_symbol: String,
    /// Text of the empty-state row
    pub empty_message: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        let format = FormatOptions::default();
        Self {
            double_press_ms: DOUBLE_PRESS_WINDOW.as_millis() as u64,
            blur_commit_delay_ms: BLUR_COMMIT_DELAY.as_millis() as u64,
            default_mode: GridMode::Spreadsheet,
            row_key_field: DEFAULT_ROW_KEY.to_string(),
            default_badge_color: format.default_badge_color,
            currency_symbol: format.currency_symbol,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

impl GridConfig {
    pub fn double_press_window(&self) -> Duration {
        Duration::from_millis(self.double_press_ms)
    }

    pub fn blur_commit_delay(&self) -> Duration {
        Duration::from_millis(self.blur_commit_delay_ms)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let path = crate::config_paths::config_file()
            .context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
