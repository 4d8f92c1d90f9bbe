//! Update functions for the Elm-style architecture
//!
//! All grid input flows through [`update_grid`]: the four delegated table
//! listeners, the editor element's own events, and the frames and timers the
//! grid asked for earlier.

mod cell;
mod editor;
mod pointer;

use crate::commands::Cmd;
use crate::grid::DataGrid;
use crate::messages::{FrameTask, GridMsg};
use crate::render::Patch;

#[cfg(debug_assertions)]
use crate::tracing::GridSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update_grid(grid: &mut DataGrid, msg: GridMsg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(grid, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(grid, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(grid: &mut DataGrid, msg: GridMsg) -> Option<Cmd> {
    let result = match msg {
        GridMsg::Click { row, col } => pointer::click(grid, row, col),
        GridMsg::DoubleClick { row, col } => pointer::double_click(grid, row, col),
        GridMsg::FocusIn { row, col } => pointer::focus_in(grid, row, col),

        // Keys reach whichever handler owns focus right now; a stray cell
        // keydown while editing still belongs to the editor
        GridMsg::KeyDown(ev) | GridMsg::EditorKeyDown(ev) => {
            if grid.is_editing() {
                editor::key_down(grid, ev)
            } else {
                cell::key_down(grid, ev)
            }
        }

        GridMsg::EditorInput { value, cursor } => editor::input(grid, &value, cursor),
        GridMsg::EditorBlur => editor::blur(grid),
        GridMsg::BlurTimeout { generation } => editor::blur_timeout(grid, generation),
        GridMsg::Frame(task) => frame(grid, task),
    };

    // API calls made while handling (e.g. create_new_row) queue their own
    let deferred = grid.drain_commands();
    match (result, deferred) {
        (result, Cmd::None) => result,
        (None, deferred) => Some(deferred),
        (Some(cmd), deferred) => Some(Cmd::batch(vec![cmd, deferred])),
    }
}

/// Run work that was deferred to an animation frame
fn frame(grid: &mut DataGrid, task: FrameTask) -> Option<Cmd> {
    match task {
        FrameTask::FocusCell { pos, open_editor } => {
            grid.focus_cell(pos.row, pos.col, open_editor);
        }
        FrameTask::FocusEditor => {
            if let Some(editor) = grid.editor.as_mut() {
                editor.blur_pending = false;
                grid.patch(Patch::FocusEditor);
            }
        }
    }
    None
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after grid state and logs the difference.
#[cfg(debug_assertions)]
fn update_traced(grid: &mut DataGrid, msg: GridMsg) -> Option<Cmd> {
    // Blur timers fire constantly while clicking around
    let is_noisy = matches!(&msg, GridMsg::BlurTimeout { .. } | GridMsg::FocusIn { .. });

    let msg_name = format!("{:?}", msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = GridSnapshot::from_grid(grid);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(grid, msg);

    if let Some(diff) = before.diff(&GridSnapshot::from_grid(grid)) {
        debug!(target: "grid", %diff, "state changed");
    }
    result
}
