//! Command types for the Elm-style architecture
//!
//! Commands are side effects the host performs after an update. The grid is
//! single-threaded and never sleeps: anything that must happen "later" is
//! handed back as a command and re-enters as a [`GridMsg`].

use std::time::Duration;

use crate::messages::{FrameTask, GridMsg};

/// Side effects requested by the grid
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Run a task on the next animation frame (send `GridMsg::Frame`)
    NextFrame(FrameTask),
    /// Send `msg` back after `delay`
    Timer { delay: Duration, msg: Box<GridMsg> },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, dropping `None`s and unwrapping singletons
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Focus a cell on the next frame
    pub fn focus_cell(pos: crate::navigation::CellPosition, open_editor: bool) -> Self {
        Cmd::NextFrame(FrameTask::FocusCell { pos, open_editor })
    }

    pub fn is_none(&self) -> bool {
        match self {
            Cmd::None => true,
            Cmd::Batch(cmds) => cmds.iter().all(Cmd::is_none),
            _ => false,
        }
    }

    /// Flatten into a list of non-batch commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}
