//! The grid controller
//!
//! [`DataGrid`] is the single source of truth for rows, columns, mode and the
//! editor overlay. Every mutation goes through it and leaves three queues
//! behind for the host to drain:
//!
//! - [`Patch`]es describing the visual change, for a [`crate::RenderSink`]
//! - [`GridEvent`]s for the page to observe and persist
//! - [`Cmd`]s for work deferred to the next frame
//!
//! Invalid indices and unknown keys are ignored (logged at `debug`), never
//! errors: a refresh can race a pending UI callback and the grid must stay
//! usable.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnDef;
use crate::commands::Cmd;
use crate::config::GridConfig;
use crate::editor::CellEditor;
use crate::events::GridEvent;
use crate::gesture::GestureTrackers;
use crate::navigation::{editable_columns, first_editable, CellPosition};
use crate::render::html::default_card_html;
use crate::render::{
    format_cell, CellContent, FormatOptions, HeaderCell, Patch, RenderedCard, RenderedRow, View,
};
use crate::row::{Row, RowKey};
use crate::templates::{CardTemplate, DetailsTemplate, RowTemplate};
use crate::validation::ValidityError;

/// Default text of the empty-state row
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data";

/// Delay between an editor blur and its commit
pub const BLUR_COMMIT_DELAY: Duration = Duration::from_millis(10);

/// Which of the two render paths is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    Spreadsheet,
    Cards,
}

impl GridMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GridMode::Spreadsheet => "spreadsheet",
            GridMode::Cards => "cards",
        }
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spreadsheet" => Ok(GridMode::Spreadsheet),
            "cards" => Ok(GridMode::Cards),
            other => Err(format!("unknown grid mode: {other}")),
        }
    }
}

/// Options for [`DataGrid::set_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDataOptions {
    /// Keep live focus and any open editor intact (default)
    pub preserve_focus: bool,
}

impl Default for SetDataOptions {
    fn default() -> Self {
        Self {
            preserve_focus: true,
        }
    }
}

/// The focused cell as reported to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCell {
    pub row: usize,
    pub col: usize,
    pub key: RowKey,
    pub field: String,
}

/// Result of trying to commit the open editor
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The editor closed; `changed` tells whether the row was modified
    Committed { changed: bool },
    /// Validation failed; the editor stays open
    Invalid(ValidityError),
    NotEditing,
}

impl CommitOutcome {
    /// True unless validation kept the editor open
    pub fn closed(&self) -> bool {
        !matches!(self, CommitOutcome::Invalid(_))
    }
}

#[derive(Debug, Clone)]
struct SavedFocus {
    position: CellPosition,
    key: RowKey,
    editing: bool,
}

/// Headless editable data grid
pub struct DataGrid {
    data: Vec<Row>,
    columns: Vec<ColumnDef>,
    mode: GridMode,
    row_key_field: String,
    selectable: bool,
    expanded: HashSet<RowKey>,
    selected_row: Option<RowKey>,
    pub(crate) editor: Option<CellEditor>,
    pub(crate) active: Option<CellPosition>,
    pub(crate) gestures: GestureTrackers,
    saved_focus: Option<SavedFocus>,

    new_row_template: Option<RowTemplate>,
    card_template: Option<CardTemplate>,
    details_template: Option<DetailsTemplate>,

    format: FormatOptions,
    pub(crate) blur_delay: Duration,
    empty_message: String,

    pub(crate) mounted: bool,
    /// A full render was skipped while an editor was open
    render_deferred: bool,
    editor_generation: u64,
    new_row_seq: u64,
    /// Counter for keys given to rows that arrive without one
    keyless_seq: u64,

    patches: Vec<Patch>,
    events: Vec<GridEvent>,
    commands: Vec<Cmd>,
}

impl Default for DataGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("rows", &self.data.len())
            .field("columns", &self.columns.len())
            .field("mode", &self.mode)
            .field("active", &self.active)
            .field("editing", &self.editor.as_ref().map(|e| e.position))
            .finish_non_exhaustive()
    }
}

impl DataGrid {
    pub fn new() -> Self {
        Self::with_config(&GridConfig::default())
    }

    pub fn with_config(config: &GridConfig) -> Self {
        Self {
            data: Vec::new(),
            columns: Vec::new(),
            mode: config.default_mode,
            row_key_field: config.row_key_field.clone(),
            selectable: false,
            expanded: HashSet::new(),
            selected_row: None,
            editor: None,
            active: None,
            gestures: GestureTrackers::with_window(config.double_press_window()),
            saved_focus: None,
            new_row_template: None,
            card_template: None,
            details_template: None,
            format: FormatOptions {
                currency_symbol: config.currency_symbol.clone(),
                default_badge_color: config.default_badge_color.clone(),
            },
            blur_delay: config.blur_commit_delay(),
            empty_message: config.empty_message.clone(),
            mounted: false,
            render_deferred: false,
            editor_generation: 0,
            new_row_seq: 0,
            keyless_seq: 0,
            patches: Vec::new(),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    // === Queues ===

    /// Take the visual changes queued since the last drain
    pub fn drain_patches(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.patches)
    }

    /// Take the outbound events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take commands requested by API calls (e.g. focus after `create_new_row`)
    pub fn drain_commands(&mut self) -> Cmd {
        Cmd::batch(std::mem::take(&mut self.commands))
    }

    pub(crate) fn patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        tracing::debug!(event = event.name(), key = %event.row_key(), "emit");
        self.events.push(event);
    }

    // === Accessors ===

    /// Current rows
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Copy of the current rows
    pub fn get_data(&self) -> Vec<Row> {
        self.data.clone()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn row_key_field(&self) -> &str {
        &self.row_key_field
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn selected_row(&self) -> Option<&RowKey> {
        self.selected_row.as_ref()
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&CellEditor> {
        self.editor.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Key of the row at `index`. Rows are given a key when they enter the
    /// grid; one whose identity value was later cleared falls back to its
    /// position (`row-<index>`).
    pub fn row_key_at(&self, index: usize) -> RowKey {
        self.data
            .get(index)
            .and_then(|row| RowKey::of(row, &self.row_key_field))
            .unwrap_or_else(|| RowKey::new(format!("row-{index}")))
    }

    /// Index of the row with `key`
    pub fn find_index(&self, key: &RowKey) -> Option<usize> {
        (0..self.data.len()).find(|i| &self.row_key_at(*i) == key)
    }

    pub(crate) fn editable_columns(&self) -> Vec<usize> {
        editable_columns(&self.columns)
    }

    pub(crate) fn is_editable(&self, col: usize) -> bool {
        self.columns.get(col).is_some_and(|c| c.editable)
    }

    pub(crate) fn in_bounds(&self, pos: CellPosition) -> bool {
        pos.row < self.data.len() && pos.col < self.columns.len()
    }

    fn cell_value(&self, pos: CellPosition) -> Value {
        match (self.data.get(pos.row), self.columns.get(pos.col)) {
            (Some(row), Some(column)) => row.get(&column.key).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    fn cell_content(&self, row: &Row, column: &ColumnDef) -> CellContent {
        let value = row.get(&column.key).unwrap_or(&Value::Null);
        format_cell(column, value, row, &self.format)
    }

    // === Templates ===

    pub fn set_new_row_template<F>(&mut self, template: F)
    where
        F: Fn() -> Row + Send + Sync + 'static,
    {
        self.new_row_template = Some(Arc::new(template));
    }

    pub fn set_card_template<F>(&mut self, template: F)
    where
        F: Fn(&Row, usize) -> String + Send + Sync + 'static,
    {
        self.card_template = Some(Arc::new(template));
        if self.mode == GridMode::Cards {
            self.render();
        }
    }

    /// Set the detail panel template. Open panels are re-rendered.
    pub fn set_details_template(&mut self, template: impl Into<DetailsTemplate>) {
        self.details_template = Some(template.into());
        if self.mode == GridMode::Spreadsheet && !self.expanded.is_empty() {
            self.refresh_details();
        }
    }

    fn refresh_details(&mut self) {
        let Some(template) = self.details_template.clone() else {
            return;
        };
        for index in 0..self.data.len() {
            let key = self.row_key_at(index);
            if self.expanded.contains(&key) {
                let html = template.render(&self.data[index]);
                self.patch(Patch::ShowDetails { key, html });
            }
        }
    }

    // === Configuration ===

    /// Replace the column set and re-render
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.commit_or_cancel();
        tracing::debug!(count = columns.len(), "set columns");
        self.columns = columns;
        if let Some(pos) = self.active {
            if pos.col >= self.columns.len() {
                self.active = None;
            }
        }
        self.render();
    }

    pub fn set_mode(&mut self, mode: GridMode) {
        if self.mode == mode {
            return;
        }
        self.commit_or_cancel();
        tracing::debug!(%mode, "set mode");
        self.mode = mode;
        self.active = None;
        self.render();
    }

    /// Change the identity field. Expansion and selection are keyed by the
    /// old field and are dropped.
    pub fn set_row_key_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if field == self.row_key_field {
            return;
        }
        self.commit_or_cancel();
        self.row_key_field = field;
        for index in 0..self.data.len() {
            self.assign_key(index);
        }
        self.expanded.clear();
        self.selected_row = None;
        self.render();
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            if let Some(key) = self.selected_row.take() {
                self.patch(Patch::SelectRow {
                    key,
                    selected: false,
                });
            }
        }
    }

    // === Data ===

    /// Replace the row set
    ///
    /// With `preserve_focus` (the default) and an editor open, the model is
    /// updated but the render waits until the editor closes, so the user's
    /// typing is never thrown away. Otherwise the editor is committed first
    /// and the table re-renders immediately.
    pub fn set_data(&mut self, rows: Vec<Row>, options: SetDataOptions) {
        tracing::debug!(rows = rows.len(), preserve_focus = options.preserve_focus, "set data");
        let editing = self.editor.is_some();
        if options.preserve_focus && !editing {
            self.save_focus();
        }
        self.data = rows;
        for index in 0..self.data.len() {
            self.assign_key(index);
        }
        self.prune_row_state();

        if editing {
            if options.preserve_focus {
                self.render_deferred = true;
                return;
            }
            self.commit_or_cancel();
        }

        self.full_render();
        if options.preserve_focus {
            self.restore_focus();
        }
    }

    /// Give row `index` a generated `key-<n>` identity if it has none, so its
    /// key survives deletes above it
    fn assign_key(&mut self, index: usize) {
        let field = &self.row_key_field;
        let Some(row) = self.data.get_mut(index) else {
            return;
        };
        if RowKey::of(row, field).is_none() {
            self.keyless_seq += 1;
            row.insert(field.clone(), Value::String(format!("key-{}", self.keyless_seq)));
        }
    }

    /// Drop expansion/selection for keys no longer present, clamp the focus
    fn prune_row_state(&mut self) {
        let keys: HashSet<RowKey> = (0..self.data.len()).map(|i| self.row_key_at(i)).collect();
        self.expanded.retain(|k| keys.contains(k));
        if self.selected_row.as_ref().is_some_and(|k| !keys.contains(k)) {
            self.selected_row = None;
        }
        if let Some(pos) = self.active {
            if pos.row >= self.data.len() {
                self.active = None;
            }
        }
    }

    /// Append a row
    pub fn add_row(&mut self, row: Row) {
        self.data.push(row);
        let index = self.data.len() - 1;
        self.assign_key(index);
        let key = self.row_key_at(index);
        tracing::debug!(%key, index, "add row");

        if self.mode == GridMode::Cards {
            self.render();
        } else if !self.render_deferred {
            if index == 0 {
                self.patch(Patch::HideEmpty);
            }
            let rendered = self.rendered_row(index);
            self.patch(Patch::AppendRow(rendered));
        }

        self.emit(GridEvent::RowCreated {
            row: index,
            key: key.to_string(),
            data: self.data[index].clone(),
        });
    }

    /// Append a row built from the new-row template (or blank values) and
    /// optionally focus its first editable cell on the next frame
    pub fn create_new_row(&mut self, focus_first_editable: bool) -> Row {
        self.commit_or_cancel();

        let mut row = match &self.new_row_template {
            Some(template) => template(),
            None => self
                .columns
                .iter()
                .map(|c| (c.key.clone(), Value::String(String::new())))
                .collect(),
        };
        if RowKey::of(&row, &self.row_key_field).is_none() {
            self.new_row_seq += 1;
            row.insert(
                self.row_key_field.clone(),
                Value::String(format!("new-{}", self.new_row_seq)),
            );
        }

        self.add_row(row.clone());

        if focus_first_editable && self.mode == GridMode::Spreadsheet {
            if let Some(col) = first_editable(&self.editable_columns()) {
                let pos = CellPosition::new(self.data.len() - 1, col);
                self.active = Some(pos);
                self.commands.push(Cmd::focus_cell(pos, false));
            }
        }
        row
    }

    /// Merge `updates` into the row with `key`, patching only changed cells
    pub fn update_row(&mut self, key: &RowKey, updates: Row) {
        let Some(index) = self.find_index(key) else {
            tracing::debug!(%key, "update_row: no such row");
            return;
        };

        let mut changed = Vec::new();
        for (field, value) in updates {
            if self.data[index].get(&field) != Some(&value) {
                self.data[index].insert(field.clone(), value);
                changed.push(field);
            }
        }
        if changed.is_empty() {
            return;
        }
        self.after_row_change(index, key, &changed);
    }

    /// Bring the view in line after fields of row `index` (formerly `key`)
    /// changed
    fn after_row_change(&mut self, index: usize, old_key: &RowKey, changed: &[String]) {
        let new_key = self.row_key_at(index);
        if &new_key != old_key {
            tracing::debug!(%old_key, %new_key, "row identity changed");
            if self.expanded.remove(old_key) {
                self.expanded.insert(new_key.clone());
            }
            if self.selected_row.as_ref() == Some(old_key) {
                self.selected_row = Some(new_key.clone());
            }
            if let Some(editor) = self.editor.as_mut().filter(|e| &e.row_key == old_key) {
                editor.row_key = new_key;
            }
            self.render();
            return;
        }

        if self.mode == GridMode::Cards {
            self.render();
            return;
        }
        if self.render_deferred {
            return;
        }

        for (col, column) in self.columns.iter().enumerate() {
            if changed.contains(&column.key) {
                let content = self.cell_content(&self.data[index], column);
                self.patches.push(Patch::UpdateCell {
                    key: new_key.clone(),
                    col,
                    content,
                });
            }
        }

        if self.expanded.contains(&new_key) {
            if let Some(template) = &self.details_template {
                let html = template.render(&self.data[index]);
                self.patches.push(Patch::ShowDetails { key: new_key, html });
            }
        }
    }

    /// Remove the row with `key`
    pub fn delete_row(&mut self, key: &RowKey) {
        let Some(index) = self.find_index(key) else {
            tracing::debug!(%key, "delete_row: no such row");
            return;
        };

        if self.editor.as_ref().is_some_and(|e| &e.row_key == key) {
            self.cancel_editor();
        }

        let row = self.data.remove(index);
        self.expanded.remove(key);
        if self.selected_row.as_ref() == Some(key) {
            self.selected_row = None;
        }
        if let Some(editor) = self.editor.as_mut() {
            if editor.position.row > index {
                editor.position.row -= 1;
            }
        }
        self.active = match self.active {
            Some(pos) if pos.row > index => Some(CellPosition::new(pos.row - 1, pos.col)),
            Some(pos) if pos.row == index => {
                (!self.data.is_empty()).then(|| CellPosition::new(index.min(self.data.len() - 1), pos.col))
            }
            other => other,
        };
        tracing::debug!(%key, index, "delete row");

        if self.mode == GridMode::Cards {
            self.render();
        } else if !self.render_deferred {
            self.patch(Patch::RemoveRow(key.clone()));
            self.patch(Patch::ReindexRows);
            if self.data.is_empty() {
                self.patch(Patch::ShowEmpty(self.empty_message.clone()));
            }
        }

        self.emit(GridEvent::RowDeleted {
            row: index,
            key: key.to_string(),
            data: row,
        });
    }

    /// Open or close the detail panel under a row. Returns whether it is now
    /// open; always false without a details template.
    pub fn toggle_row_details(&mut self, key: &RowKey) -> bool {
        let Some(template) = self.details_template.clone() else {
            tracing::debug!(%key, "toggle_row_details: no template");
            return false;
        };
        let Some(index) = self.find_index(key) else {
            tracing::debug!(%key, "toggle_row_details: no such row");
            return false;
        };

        let show = self.mode == GridMode::Spreadsheet && !self.render_deferred;
        if self.expanded.remove(key) {
            if show {
                self.patch(Patch::HideDetails(key.clone()));
            }
            false
        } else {
            self.expanded.insert(key.clone());
            if show {
                let html = template.render(&self.data[index]);
                self.patch(Patch::ShowDetails {
                    key: key.clone(),
                    html,
                });
            }
            true
        }
    }

    // === Focus ===

    /// Select a cell and optionally open its editor (editable columns only).
    /// Returns false when the cell does not exist.
    pub fn focus_cell(&mut self, row: usize, col: usize, open_editor: bool) -> bool {
        let pos = CellPosition::new(row, col);
        if self.mode != GridMode::Spreadsheet || !self.in_bounds(pos) {
            tracing::debug!(row, col, "focus_cell: out of range");
            return false;
        }

        if self.editor.as_ref().is_some_and(|e| e.position != pos) {
            self.commit_or_cancel();
        }

        self.active = Some(pos);
        if open_editor && self.is_editable(col) {
            self.open_editor(pos);
        } else if self.editor.is_none() {
            self.patch(Patch::FocusCell(pos));
        }
        true
    }

    pub fn active_cell(&self) -> Option<ActiveCell> {
        let pos = self.active?;
        let column = self.columns.get(pos.col)?;
        if pos.row >= self.data.len() {
            return None;
        }
        Some(ActiveCell {
            row: pos.row,
            col: pos.col,
            key: self.row_key_at(pos.row),
            field: column.key.clone(),
        })
    }

    /// Remember the focused cell (and whether it was being edited)
    pub fn save_focus(&mut self) {
        self.saved_focus = self.active.map(|position| SavedFocus {
            position,
            key: self.row_key_at(position.row),
            editing: self.editor.as_ref().is_some_and(|e| e.position == position),
        });
    }

    /// Focus the saved cell again, following its row if it moved. Returns
    /// false when nothing was saved or the cell is gone.
    pub fn restore_focus(&mut self) -> bool {
        let Some(saved) = self.saved_focus.take() else {
            return false;
        };
        let row = self.find_index(&saved.key).unwrap_or(saved.position.row);
        self.focus_cell(row, saved.position.col, saved.editing)
    }

    // === Editor ===

    /// Open the editor over `pos`, closing any other editor first
    pub fn open_editor(&mut self, pos: CellPosition) -> bool {
        if self.mode != GridMode::Spreadsheet || !self.in_bounds(pos) || !self.is_editable(pos.col) {
            tracing::debug!(?pos, "open_editor: not an editable cell");
            return false;
        }
        if self.editor.as_ref().is_some_and(|e| e.position == pos) {
            self.patch(Patch::FocusEditor);
            return true;
        }
        if self.editor.is_some() {
            self.commit_or_cancel();
            // A deferred render may have replaced the rows
            if !self.in_bounds(pos) {
                return false;
            }
        }

        let editor = self.new_editor(pos);
        self.install_editor(editor);
        true
    }

    /// Open the editor over `pos` with its text replaced by `ch`
    pub fn open_editor_with_char(&mut self, pos: CellPosition, ch: char) -> bool {
        if !self.open_editor(pos) {
            return false;
        }
        let Some(editor) = self.editor.take() else {
            return false;
        };
        let editor = editor.seeded_with(ch);
        self.install_editor(editor);
        self.emit_cell_change();
        true
    }

    fn new_editor(&mut self, pos: CellPosition) -> CellEditor {
        self.editor_generation += 1;
        let key = self.row_key_at(pos.row);
        let column = &self.columns[pos.col];
        let original = self.cell_value(pos);
        let display = self.cell_content(&self.data[pos.row], column);
        CellEditor::new(pos, key, column, original, display, self.editor_generation)
    }

    fn install_editor(&mut self, editor: CellEditor) {
        tracing::debug!(pos = ?editor.position, generation = editor.generation, "open editor");
        self.active = Some(editor.position);
        self.patch(Patch::OpenEditor(editor.overlay()));
        self.editor = Some(editor);
    }

    /// Emit `cell-change` for the editor's current text
    pub(crate) fn emit_cell_change(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let event = GridEvent::CellChange {
            row: editor.position.row,
            col: editor.position.col,
            key: editor.row_key.to_string(),
            field: editor.column_key.clone(),
            value: editor.value().to_string(),
        };
        self.emit(event);
    }

    /// Validate and store the editor's value
    ///
    /// On failure the validity message is reported and focus returns to the
    /// editor. On success the cell is reformatted and `cell-blur` is emitted
    /// when the value actually changed.
    pub fn commit_editor(&mut self) -> CommitOutcome {
        let Some(editor) = self.editor.as_ref() else {
            return CommitOutcome::NotEditing;
        };

        if let Err(err) = editor.validate() {
            tracing::debug!(pos = ?editor.position, %err, "commit blocked");
            self.patch(Patch::ReportValidity(err.to_string()));
            self.patch(Patch::FocusEditor);
            return CommitOutcome::Invalid(err);
        }

        let Some(editor) = self.editor.take() else {
            return CommitOutcome::NotEditing;
        };
        self.follow_edited_row(&editor);
        let value = editor.committed_value();
        let mut changed = false;

        match self.find_index(&editor.row_key) {
            Some(index) => {
                changed = value != editor.original;
                let current = self.data[index].get(&editor.column_key);
                if changed && current != Some(&value) {
                    self.data[index].insert(editor.column_key.clone(), value.clone());
                }
                let col = self.columns.iter().position(|c| c.key == editor.column_key);
                if let (Some(col), false) = (col, self.render_deferred) {
                    let content = self.cell_content(&self.data[index], &self.columns[col]);
                    self.patch(Patch::UpdateCell {
                        key: editor.row_key.clone(),
                        col,
                        content,
                    });
                }
                self.patch(Patch::CloseEditor);

                if changed {
                    tracing::debug!(key = %editor.row_key, field = %editor.column_key, "cell committed");
                    self.emit(GridEvent::CellBlur {
                        row: index,
                        col: editor.position.col,
                        key: editor.row_key.to_string(),
                        field: editor.column_key.clone(),
                        old_value: editor.original.clone(),
                        value,
                        data: self.data[index].clone(),
                    });
                    let fields = [editor.column_key.clone()];
                    let key = editor.row_key.clone();
                    if editor.column_key == self.row_key_field {
                        self.after_row_change(index, &key, &fields);
                    } else if self.expanded.contains(&key) && !self.render_deferred {
                        self.refresh_row_details(index, key);
                    }
                }
            }
            None => {
                tracing::debug!(key = %editor.row_key, "commit: row no longer exists");
                self.patch(Patch::CloseEditor);
            }
        }

        self.flush_deferred_render();
        CommitOutcome::Committed { changed }
    }

    fn refresh_row_details(&mut self, index: usize, key: RowKey) {
        if let Some(template) = &self.details_template {
            let html = template.render(&self.data[index]);
            self.patches.push(Patch::ShowDetails { key, html });
        }
    }

    /// Close the editor without touching the data. Returns false when no
    /// editor was open.
    pub fn cancel_editor(&mut self) -> bool {
        let Some(editor) = self.editor.take() else {
            return false;
        };
        tracing::debug!(pos = ?editor.position, "cancel editor");
        self.follow_edited_row(&editor);
        if !self.render_deferred {
            if let Some(col) = self.columns.iter().position(|c| c.key == editor.column_key) {
                self.patch(Patch::UpdateCell {
                    key: editor.row_key.clone(),
                    col,
                    content: editor.original_display.clone(),
                });
            }
        }
        self.patch(Patch::CloseEditor);
        self.flush_deferred_render();
        true
    }

    /// Point the focus at the edited cell's current row. `set_data` during
    /// the edit may have moved it.
    fn follow_edited_row(&mut self, editor: &CellEditor) {
        let Some(row) = self.find_index(&editor.row_key) else {
            return;
        };
        if self.active.map_or(true, |p| p == editor.position) {
            self.active = Some(CellPosition::new(row, editor.position.col));
        }
    }

    /// Close any open editor: commit if valid, cancel otherwise. Returns
    /// true when no editor remains.
    pub fn commit_or_cancel(&mut self) -> bool {
        match self.commit_editor() {
            CommitOutcome::Invalid(_) => {
                self.cancel_editor();
            }
            CommitOutcome::Committed { .. } | CommitOutcome::NotEditing => {}
        }
        self.editor.is_none()
    }

    fn flush_deferred_render(&mut self) {
        if self.render_deferred && self.editor.is_none() {
            tracing::debug!("performing render deferred during edit");
            self.save_focus();
            self.full_render();
            self.restore_focus();
        }
    }

    // === Rendering ===

    /// Close any editor and rebuild the whole view
    pub fn render(&mut self) {
        self.commit_or_cancel();
        self.full_render();
    }

    fn full_render(&mut self) {
        self.render_deferred = false;
        let view = self.build_view();
        self.patches.push(Patch::DetachListeners);
        self.patches.push(Patch::Render(view));
        self.patches.push(Patch::AttachListeners);
    }

    /// Everything a full render shows
    pub fn build_view(&self) -> View {
        let empty_message = self.data.is_empty().then(|| self.empty_message.clone());
        match self.mode {
            GridMode::Spreadsheet => {
                let header = self
                    .columns
                    .iter()
                    .map(|c| HeaderCell {
                        key: c.key.clone(),
                        label: c.label.clone(),
                        align: c.align,
                        width: c.width.clone(),
                        editable: c.editable,
                    })
                    .collect();
                let rows = (0..self.data.len()).map(|i| self.rendered_row(i)).collect();
                let details = match &self.details_template {
                    Some(template) => (0..self.data.len())
                        .filter_map(|i| {
                            let key = self.row_key_at(i);
                            self.expanded
                                .contains(&key)
                                .then(|| (key, template.render(&self.data[i])))
                        })
                        .collect(),
                    None => Vec::new(),
                };
                View::Table {
                    header,
                    rows,
                    details,
                    empty_message,
                }
            }
            GridMode::Cards => {
                let cards = self
                    .data
                    .iter()
                    .enumerate()
                    .map(|(index, row)| {
                        let html = match &self.card_template {
                            Some(template) => template(row, index),
                            None => {
                                let cells: Vec<CellContent> =
                                    self.columns.iter().map(|c| self.cell_content(row, c)).collect();
                                default_card_html(row, &self.columns, &cells)
                            }
                        };
                        RenderedCard {
                            key: self.row_key_at(index),
                            index,
                            html,
                        }
                    })
                    .collect();
                View::Cards {
                    cards,
                    empty_message,
                }
            }
        }
    }

    fn rendered_row(&self, index: usize) -> RenderedRow {
        let row = &self.data[index];
        let key = self.row_key_at(index);
        RenderedRow {
            selected: self.selected_row.as_ref() == Some(&key),
            key,
            index,
            cells: self.columns.iter().map(|c| self.cell_content(row, c)).collect(),
        }
    }

    // === Selection ===

    /// Toggle the selection of row `index` and emit `row-select`
    pub(crate) fn toggle_selection(&mut self, index: usize) {
        let key = self.row_key_at(index);
        let selected = self.selected_row.as_ref() != Some(&key);
        if let Some(previous) = self.selected_row.take() {
            self.patch(Patch::SelectRow {
                key: previous,
                selected: false,
            });
        }
        if selected {
            self.selected_row = Some(key.clone());
            self.patch(Patch::SelectRow {
                key: key.clone(),
                selected: true,
            });
        }
        self.emit(GridEvent::RowSelect {
            row: index,
            key: key.to_string(),
            selected,
            data: self.data[index].clone(),
        });
    }

    /// Emit `cell-click` for the cell at `pos`
    pub(crate) fn emit_cell_click(&mut self, pos: CellPosition) {
        let Some(column) = self.columns.get(pos.col) else {
            return;
        };
        let event = GridEvent::CellClick {
            row: pos.row,
            col: pos.col,
            key: self.row_key_at(pos.row).to_string(),
            field: column.key.clone(),
            value: self.cell_value(pos),
        };
        self.emit(event);
    }

    // === Lifecycle ===

    pub(crate) fn mount(&mut self) {
        self.mounted = true;
        self.full_render();
    }

    pub(crate) fn unmount(&mut self) {
        self.commit_or_cancel();
        self.saved_focus = None;
        self.gestures.reset_all();
        self.mounted = false;
        self.patch(Patch::DetachListeners);
    }
}
