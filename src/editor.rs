//! The cell editor overlay
//!
//! At most one [`CellEditor`] exists per grid. It remembers where it was
//! opened, the value the cell held at that moment and the text the user has
//! typed so far. Committing and cancelling are driven by [`crate::DataGrid`].

use serde_json::Value;

use crate::column::{ColumnDef, ColumnType};
use crate::input::TextInput;
use crate::navigation::CellPosition;
use crate::numeric::{number_value, parse_numeric};
use crate::render::{CellContent, EditorOverlay};
use crate::row::{value_text, RowKey};
use crate::validation::{Validation, ValidityError};

/// State of an open editor
#[derive(Debug, Clone)]
pub struct CellEditor {
    /// Cell the editor was opened over
    pub position: CellPosition,
    pub row_key: RowKey,
    pub column_key: String,
    pub column_type: ColumnType,
    pub input: TextInput,
    /// Field value when the editor opened
    pub original: Value,
    /// What the cell showed before editing, restored on cancel
    pub original_display: CellContent,
    pub validation: Option<Validation>,
    /// Distinguishes this editor from earlier ones for stale blur timers
    pub generation: u64,
    /// A blur was seen and its grace timer is running
    pub blur_pending: bool,
}

impl CellEditor {
    /// Open over `position` with the field's raw value
    pub fn new(
        position: CellPosition,
        row_key: RowKey,
        column: &ColumnDef,
        original: Value,
        original_display: CellContent,
        generation: u64,
    ) -> Self {
        let max_length = column.validation.as_ref().and_then(|v| v.max_length);
        let input = TextInput::new(&value_text(&original), column.multiline).with_max_length(max_length);
        Self {
            position,
            row_key,
            column_key: column.key.clone(),
            column_type: column.column_type,
            input,
            original,
            original_display,
            validation: column.validation.clone(),
            generation,
            blur_pending: false,
        }
    }

    /// Replace the initial text with a typed character (caret after it)
    pub fn seeded_with(mut self, ch: char) -> Self {
        self.input.set_value(&ch.to_string(), None);
        self
    }

    /// Current text in the editor
    pub fn value(&self) -> &str {
        self.input.text()
    }

    pub fn is_multiline(&self) -> bool {
        self.input.is_multiline()
    }

    /// Native constraint validation against the column's rules
    pub fn validate(&self) -> Result<(), ValidityError> {
        match &self.validation {
            Some(validation) => validation.check(self.value(), self.column_type),
            None => Ok(()),
        }
    }

    /// The value a commit stores in the row
    ///
    /// Numeric columns go through [`parse_numeric`]. Other columns keep the
    /// original value when the text is unchanged so `5` does not become `"5"`.
    pub fn committed_value(&self) -> Value {
        if self.column_type.is_numeric() {
            return number_value(parse_numeric(self.value()));
        }
        if self.value() == value_text(&self.original) {
            self.original.clone()
        } else {
            Value::String(self.value().to_string())
        }
    }

    /// Describe the overlay for the render sink
    pub fn overlay(&self) -> EditorOverlay {
        EditorOverlay {
            position: self.position,
            row_key: self.row_key.clone(),
            column_key: self.column_key.clone(),
            multiline: self.is_multiline(),
            value: self.value().to_string(),
            attrs: self
                .validation
                .as_ref()
                .map(Validation::attributes)
                .unwrap_or_default(),
        }
    }
}
