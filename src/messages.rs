//! Message types for the Elm-style architecture
//!
//! Everything a host observes on the grid's table element arrives as a
//! [`GridMsg`]: the four delegated listeners (click, dblclick, keydown,
//! focusin), the editor element's own events, and the timers/frames the grid
//! asked for through [`crate::Cmd`].

use crate::keys::KeyEvent;
use crate::navigation::CellPosition;

/// Work deferred to the next animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Move keyboard focus to a cell, optionally opening its editor
    FocusCell {
        pos: CellPosition,
        open_editor: bool,
    },
    /// Put keyboard focus back into the open editor
    FocusEditor,
}

/// Input to the grid
#[derive(Debug, Clone, PartialEq)]
pub enum GridMsg {
    // === Delegated table listeners ===
    /// Click on the cell at (row, col)
    Click { row: usize, col: usize },
    /// Double click on the cell at (row, col)
    DoubleClick { row: usize, col: usize },
    /// A cell received focus
    FocusIn { row: usize, col: usize },
    /// Key pressed while a cell (not the editor) has focus
    KeyDown(KeyEvent),

    // === Editor element ===
    /// Key pressed inside the open editor
    EditorKeyDown(KeyEvent),
    /// The editor element reported a new value (host-owned text input)
    EditorInput { value: String, cursor: Option<usize> },
    /// The editor lost focus
    EditorBlur,

    // === Deferred work ===
    /// Blur grace period elapsed for the editor with this generation
    BlurTimeout { generation: u64 },
    /// An animation frame arrived for a task requested earlier
    Frame(FrameTask),
}
