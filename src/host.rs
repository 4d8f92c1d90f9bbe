//! Headless host
//!
//! Plays the part of the browser: owns a [`DomMirror`], runs the timers and
//! animation frames the grid asks for against a manual clock, and records
//! every emitted event. Used by the integration tests and the CLI.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::events::GridEvent;
use crate::grid::DataGrid;
use crate::keys::{KeyCode, KeyEvent, Modifiers};
use crate::lifecycle::Component;
use crate::messages::{FrameTask, GridMsg};
use crate::render::{DomMirror, RenderSink};
use crate::update::update_grid;

/// Frames are run until the queue settles, at most this many rounds
const MAX_FRAME_ROUNDS: usize = 16;

pub struct HeadlessHost {
    pub grid: DataGrid,
    pub dom: DomMirror,
    /// Every event emitted so far, oldest first
    pub events: Vec<GridEvent>,
    now: Instant,
    timers: Vec<(Instant, GridMsg)>,
    frames: VecDeque<FrameTask>,
}

impl HeadlessHost {
    /// Mount `grid` and apply its first render
    pub fn new(mut grid: DataGrid) -> Self {
        grid.on_mount();
        let mut host = Self {
            grid,
            dom: DomMirror::new(),
            events: Vec::new(),
            now: Instant::now(),
            timers: Vec::new(),
            frames: VecDeque::new(),
        };
        host.flush();
        host
    }

    /// The host's clock
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Deliver one message and apply its effects (frames are not run)
    pub fn send(&mut self, msg: GridMsg) {
        if let Some(cmd) = update_grid(&mut self.grid, msg) {
            self.schedule(cmd);
        }
        self.flush();
    }

    /// Call grid API methods, then apply their effects
    pub fn with_grid<R>(&mut self, f: impl FnOnce(&mut DataGrid) -> R) -> R {
        let result = f(&mut self.grid);
        self.flush();
        result
    }

    fn schedule(&mut self, cmd: Cmd) {
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::NextFrame(task) => self.frames.push_back(task),
                Cmd::Timer { delay, msg } => self.timers.push((self.now + delay, *msg)),
                Cmd::None | Cmd::Batch(_) => {}
            }
        }
    }

    fn flush(&mut self) {
        let patches = self.grid.drain_patches();
        self.dom.apply_all(&patches);
        self.events.extend(self.grid.drain_events());
        let deferred = self.grid.drain_commands();
        self.schedule(deferred);
    }

    /// Run the frame tasks queued so far. Returns how many ran.
    pub fn next_frame(&mut self) -> usize {
        let tasks: Vec<FrameTask> = self.frames.drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            self.send(GridMsg::Frame(task));
        }
        count
    }

    /// Run frames until none are pending
    pub fn settle(&mut self) {
        for _ in 0..MAX_FRAME_ROUNDS {
            if self.next_frame() == 0 {
                return;
            }
        }
        tracing::warn!("frame queue did not settle");
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        loop {
            let due = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (at, _))| *at <= self.now)
                .min_by_key(|(_, (at, _))| *at)
                .map(|(i, _)| i);
            let Some(index) = due else {
                break;
            };
            let (_, msg) = self.timers.remove(index);
            self.send(msg);
        }
        self.settle();
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // === Simulated user input ===

    pub fn click(&mut self, row: usize, col: usize) {
        self.send(GridMsg::Click { row, col });
        self.settle();
    }

    pub fn double_click(&mut self, row: usize, col: usize) {
        self.send(GridMsg::Click { row, col });
        self.send(GridMsg::DoubleClick { row, col });
        self.settle();
    }

    /// Press a key wherever focus currently is (editor or cell)
    pub fn press(&mut self, key: KeyCode, mods: Modifiers) {
        let ev = KeyEvent::new(key, mods, self.now);
        let msg = if self.grid.is_editing() {
            GridMsg::EditorKeyDown(ev)
        } else {
            GridMsg::KeyDown(ev)
        };
        self.send(msg);
        self.settle();
    }

    pub fn key(&mut self, key: KeyCode) {
        self.press(key, Modifiers::NONE);
    }

    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(KeyCode::Char(ch));
        }
    }

    /// Focus left the editor for nothing in particular; the blur grace
    /// period runs out
    pub fn blur_editor(&mut self) {
        self.send(GridMsg::EditorBlur);
        let delay = self.grid.blur_delay;
        self.advance(delay);
    }

    /// Events of one kind, by DOM event name
    pub fn events_named(&self, name: &str) -> Vec<&GridEvent> {
        self.events.iter().filter(|e| e.name() == name).collect()
    }
}
