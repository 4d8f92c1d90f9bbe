//! Keyboard handling on a focused editable cell (no editor open)

use crate::commands::Cmd;
use crate::gesture::Gesture;
use crate::grid::DataGrid;
use crate::keys::{KeyCode, KeyEvent};
use crate::navigation::{horizontal_loop, tab, vertical, CellPosition, Horizontal, Vertical};

pub(super) fn key_down(grid: &mut DataGrid, ev: KeyEvent) -> Option<Cmd> {
    let pos = grid.active.filter(|p| grid.in_bounds(*p))?;
    if !grid.is_editable(pos.col) {
        tracing::trace!(?pos, "key on read-only cell");
        return None;
    }

    match ev.key {
        KeyCode::ArrowUp => move_vertical(grid, pos, -1, ev),
        KeyCode::ArrowDown => move_vertical(grid, pos, 1, ev),
        KeyCode::ArrowLeft => move_horizontal(grid, pos, Horizontal::Left),
        KeyCode::ArrowRight => move_horizontal(grid, pos, Horizontal::Right),
        KeyCode::Tab => move_tab(grid, pos, ev.mods.shift()),
        KeyCode::Enter => {
            grid.open_editor(pos);
            None
        }
        KeyCode::Delete => delete_gesture(grid, pos, ev),
        _ => {
            // Typing on a selected cell starts editing with that character
            let ch = ev.typed_char()?;
            grid.open_editor_with_char(pos, ch);
            None
        }
    }
}

/// Select `next` now, move DOM focus on the next frame
pub(super) fn focus(grid: &mut DataGrid, next: CellPosition) -> Option<Cmd> {
    grid.active = Some(next);
    Some(Cmd::focus_cell(next, false))
}

/// ArrowUp/ArrowDown. Past the last row of an editable column, two quick
/// presses append a row.
pub(super) fn move_vertical(grid: &mut DataGrid, pos: CellPosition, delta: i32, ev: KeyEvent) -> Option<Cmd> {
    match vertical(pos, delta, grid.row_count()) {
        Vertical::To(next) => focus(grid, next),
        Vertical::Top => None,
        Vertical::PastEnd => {
            if grid.is_editable(pos.col) && grid.gestures.press(Gesture::NewRow, ev.at) {
                tracing::debug!(row = pos.row, "new-row gesture");
                grid.create_new_row(true);
            }
            None
        }
    }
}

pub(super) fn move_horizontal(grid: &mut DataGrid, pos: CellPosition, dir: Horizontal) -> Option<Cmd> {
    let next = horizontal_loop(pos, dir, &grid.editable_columns());
    if next == pos {
        return None;
    }
    focus(grid, next)
}

/// Tab/Shift+Tab. At the grid's first/last editable cell focus stays put.
pub(super) fn move_tab(grid: &mut DataGrid, pos: CellPosition, backward: bool) -> Option<Cmd> {
    let next = tab(pos, backward, &grid.editable_columns(), grid.row_count());
    focus(grid, next)
}

/// Ctrl+Delete / Shift+Delete pressed twice deletes the row
pub(super) fn delete_gesture(grid: &mut DataGrid, pos: CellPosition, ev: KeyEvent) -> Option<Cmd> {
    if ev.mods.alt() || ev.mods.meta() {
        return None;
    }
    let gesture = match (ev.mods.ctrl(), ev.mods.shift()) {
        (true, false) => Gesture::CtrlDelete,
        (false, true) => Gesture::ShiftDelete,
        _ => return None,
    };
    if !grid.gestures.press(gesture, ev.at) {
        return None;
    }

    let key = grid.row_key_at(pos.row);
    tracing::debug!(%key, ?gesture, "delete gesture");
    grid.delete_row(&key);
    grid.active.map(|next| Cmd::focus_cell(next, false))
}
