//! Delegated click, double-click and focus handling

use crate::commands::Cmd;
use crate::grid::{CommitOutcome, DataGrid, GridMode};
use crate::navigation::CellPosition;
use crate::render::Patch;

/// Click on a cell
///
/// Emits `cell-click`. Clicking away from an open editor commits it and, if
/// the clicked cell is editable, reopens the editor there. Non-editable
/// cells toggle the row selection on selectable grids.
pub(super) fn click(grid: &mut DataGrid, row: usize, col: usize) -> Option<Cmd> {
    let pos = CellPosition::new(row, col);
    if grid.mode() != GridMode::Spreadsheet || !grid.in_bounds(pos) {
        tracing::debug!(row, col, "click outside the grid");
        return None;
    }

    let reopen = match grid.editor() {
        Some(editor) if editor.position == pos => return None,
        Some(_) => {
            if let CommitOutcome::Invalid(_) = grid.commit_editor() {
                return None;
            }
            if !grid.in_bounds(pos) {
                return None;
            }
            true
        }
        None => false,
    };

    grid.emit_cell_click(pos);
    grid.active = Some(pos);
    grid.patch(Patch::FocusCell(pos));

    if grid.is_editable(col) {
        if reopen {
            grid.open_editor(pos);
        }
    } else if grid.is_selectable() {
        grid.toggle_selection(row);
    }
    None
}

/// Double click opens the editor on editable cells
pub(super) fn double_click(grid: &mut DataGrid, row: usize, col: usize) -> Option<Cmd> {
    let pos = CellPosition::new(row, col);
    if grid.in_bounds(pos) && grid.is_editable(col) {
        grid.open_editor(pos);
    }
    None
}

/// A cell received keyboard focus from the browser
pub(super) fn focus_in(grid: &mut DataGrid, row: usize, col: usize) -> Option<Cmd> {
    let pos = CellPosition::new(row, col);
    if grid.in_bounds(pos) && !grid.is_editing() {
        grid.active = Some(pos);
    }
    None
}
