//! Keyboard and input handling inside the open editor
//!
//! Arrow keys move the caret until it sits at the boundary in that
//! direction; one more press commits and navigates like the cell-level
//! handler. Gesture trackers are shared with it, so a double press may start
//! in the editor and finish on the cell.

use crate::commands::Cmd;
use crate::grid::{CommitOutcome, DataGrid};
use crate::input::TextInput;
use crate::keys::{KeyCode, KeyEvent};
use crate::messages::GridMsg;
use crate::navigation::{CellPosition, Horizontal};

use super::cell;

pub(super) fn key_down(grid: &mut DataGrid, ev: KeyEvent) -> Option<Cmd> {
    let editor = grid.editor.as_mut()?;
    editor.blur_pending = false;

    let pos = editor.position;
    let row_key = editor.row_key.clone();
    let multiline = editor.is_multiline();
    let input = &editor.input;
    let at_start = input.is_at_start() && !input.has_selection();
    let at_end = input.is_at_end() && !input.has_selection();
    let first_line = input.is_on_first_line();
    let last_line = input.is_on_last_line();

    let shift = ev.mods.shift();
    let command = ev.mods.has_command();

    match ev.key {
        KeyCode::Escape => {
            grid.cancel_editor();
            edited_cell(grid).map(|pos| Cmd::focus_cell(pos, false))
        }
        KeyCode::Enter if shift => {
            if multiline {
                edit(grid, |input| input.insert_char('\n'))
            } else {
                None
            }
        }
        KeyCode::Enter => commit_then(grid, |_, pos| Some(Cmd::focus_cell(pos, false))),
        KeyCode::Tab => commit_then(grid, |grid, pos| cell::move_tab(grid, pos, shift)),

        KeyCode::ArrowLeft if at_start && !shift => {
            commit_then(grid, |grid, pos| cell::move_horizontal(grid, pos, Horizontal::Left))
        }
        KeyCode::ArrowRight if at_end && !shift => {
            commit_then(grid, |grid, pos| cell::move_horizontal(grid, pos, Horizontal::Right))
        }
        KeyCode::ArrowUp if at_start && !shift => {
            commit_then(grid, |grid, pos| cell::move_vertical(grid, pos, -1, ev))
        }
        KeyCode::ArrowDown if at_end && !shift => {
            commit_then(grid, |grid, pos| cell::move_vertical(grid, pos, 1, ev))
        }
        KeyCode::ArrowLeft => caret(grid, |input| input.move_left(shift)),
        KeyCode::ArrowRight => caret(grid, |input| input.move_right(shift)),
        KeyCode::ArrowUp if first_line => caret(grid, |input| input.move_home(shift)),
        KeyCode::ArrowUp => caret(grid, |input| input.move_up(shift)),
        KeyCode::ArrowDown if last_line => caret(grid, |input| input.move_end(shift)),
        KeyCode::ArrowDown => caret(grid, |input| input.move_down(shift)),
        KeyCode::Home => caret(grid, |input| input.move_home(shift)),
        KeyCode::End => caret(grid, |input| input.move_end(shift)),

        KeyCode::Backspace => edit(grid, TextInput::delete_backward),
        KeyCode::Delete if ev.mods.ctrl() || shift => {
            // The rows may have been replaced since the editor opened
            let row = grid.find_index(&row_key)?;
            cell::delete_gesture(grid, CellPosition::new(row, pos.col), ev)
        }
        KeyCode::Delete => edit(grid, TextInput::delete_forward),

        KeyCode::Char(c) if command => match c.to_ascii_lowercase() {
            'a' => caret(grid, TextInput::select_all),
            'z' if shift => edit(grid, TextInput::redo),
            'z' => edit(grid, TextInput::undo),
            'y' => edit(grid, TextInput::redo),
            _ => None,
        },
        _ => {
            let ch = ev.typed_char()?;
            edit(grid, |input| input.insert_char(ch))
        }
    }
}

/// The host's editor element reported a new value
pub(super) fn input(grid: &mut DataGrid, value: &str, cursor: Option<usize>) -> Option<Cmd> {
    let editor = grid.editor.as_mut()?;
    if editor.value() == value {
        return None;
    }
    editor.input.set_value(value, cursor);
    grid.emit_cell_change();
    None
}

/// The editor lost focus: commit after a short grace period unless another
/// cell claims the click first
pub(super) fn blur(grid: &mut DataGrid) -> Option<Cmd> {
    let delay = grid.blur_delay;
    let editor = grid.editor.as_mut()?;
    editor.blur_pending = true;
    Some(Cmd::Timer {
        delay,
        msg: Box::new(GridMsg::BlurTimeout {
            generation: editor.generation,
        }),
    })
}

pub(super) fn blur_timeout(grid: &mut DataGrid, generation: u64) -> Option<Cmd> {
    let editor = grid.editor.as_mut()?;
    if editor.generation != generation || !editor.blur_pending {
        tracing::trace!(generation, "stale blur timer");
        return None;
    }
    editor.blur_pending = false;
    // Nothing else took focus; an invalid value keeps the editor open
    grid.commit_editor();
    None
}

/// Commit, then run `next` from the edited cell unless validation kept the
/// editor open
fn commit_then<F>(grid: &mut DataGrid, next: F) -> Option<Cmd>
where
    F: FnOnce(&mut DataGrid, CellPosition) -> Option<Cmd>,
{
    match grid.commit_editor() {
        CommitOutcome::Invalid(_) => None,
        CommitOutcome::Committed { .. } | CommitOutcome::NotEditing => {
            let pos = edited_cell(grid)?;
            next(grid, pos)
        }
    }
}

/// Where the just-closed editor's cell is now
fn edited_cell(grid: &DataGrid) -> Option<CellPosition> {
    grid.active.filter(|p| grid.in_bounds(*p))
}

/// Apply a text change; emits `cell-change` when the text changed
fn edit<F>(grid: &mut DataGrid, f: F) -> Option<Cmd>
where
    F: FnOnce(&mut TextInput) -> bool,
{
    let changed = grid.editor.as_mut().is_some_and(|e| f(&mut e.input));
    if changed {
        grid.emit_cell_change();
    }
    None
}

/// Move the caret or selection
fn caret<F>(grid: &mut DataGrid, f: F) -> Option<Cmd>
where
    F: FnOnce(&mut TextInput),
{
    if let Some(editor) = grid.editor.as_mut() {
        f(&mut editor.input);
    }
    None
}
