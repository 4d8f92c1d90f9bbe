//! Double-press gesture detection
//!
//! Creating a row (ArrowDown past the last row) and deleting a row
//! (Ctrl+Delete / Shift+Delete) need two presses inside a short window. A
//! single press only arms the gesture.

use std::time::{Duration, Instant};

/// Default window between the two presses
pub const DOUBLE_PRESS_WINDOW: Duration = Duration::from_millis(500);

/// Tracks one gesture: time of the last qualifying press and how many
/// presses landed inside the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoublePress {
    time: Option<Instant>,
    count: u32,
}

impl DoublePress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press at `now`. Returns true when the gesture fires, after
    /// which the tracker is reset.
    pub fn press(&mut self, now: Instant, window: Duration) -> bool {
        let in_window = self
            .time
            .is_some_and(|t| now.saturating_duration_since(t) < window);

        if in_window {
            self.count += 1;
            if self.count >= 2 {
                self.reset();
                return true;
            }
            self.time = Some(now);
        } else {
            self.time = Some(now);
            self.count = 1;
        }
        false
    }

    pub fn reset(&mut self) {
        self.time = None;
        self.count = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.count > 0
    }
}

/// Which gesture a press belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// ArrowDown on the last row
    NewRow,
    /// Ctrl+Delete
    CtrlDelete,
    /// Shift+Delete
    ShiftDelete,
}

/// The grid's gesture trackers. Shared by the cell and editor key handlers so
/// the two presses may straddle a focus change.
#[derive(Debug, Clone)]
pub struct GestureTrackers {
    pub arrow_down: DoublePress,
    pub ctrl_delete: DoublePress,
    pub shift_delete: DoublePress,
    pub window: Duration,
}

impl Default for GestureTrackers {
    fn default() -> Self {
        Self::with_window(DOUBLE_PRESS_WINDOW)
    }
}

impl GestureTrackers {
    pub fn with_window(window: Duration) -> Self {
        Self {
            arrow_down: DoublePress::new(),
            ctrl_delete: DoublePress::new(),
            shift_delete: DoublePress::new(),
            window,
        }
    }

    /// Register a press for `gesture`; true when it fires
    pub fn press(&mut self, gesture: Gesture, now: Instant) -> bool {
        let window = self.window;
        let tracker = match gesture {
            Gesture::NewRow => &mut self.arrow_down,
            Gesture::CtrlDelete => &mut self.ctrl_delete,
            Gesture::ShiftDelete => &mut self.shift_delete,
        };
        let fired = tracker.press(now, window);
        tracing::trace!(?gesture, fired, "gesture press");
        fired
    }

    pub fn reset_all(&mut self) {
        self.arrow_down.reset();
        self.ctrl_delete.reset();
        self.shift_delete.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_single_press_only_arms() {
        let mut tracker = DoublePress::new();
        let t0 = Instant::now();
        assert!(!tracker.press(t0, DOUBLE_PRESS_WINDOW));
        assert!(tracker.is_armed());
    }

    #[test]
    fn test_double_press_fires_and_resets() {
        let mut tracker = DoublePress::new();
        let t0 = Instant::now();
        assert!(!tracker.press(t0, DOUBLE_PRESS_WINDOW));
        assert!(tracker.press(t0 + ms(200), DOUBLE_PRESS_WINDOW));
        assert!(!tracker.is_armed());

        // Third press starts over
        assert!(!tracker.press(t0 + ms(300), DOUBLE_PRESS_WINDOW));
    }

    #[test]
    fn test_slow_presses_do_not_fire() {
        let mut tracker = DoublePress::new();
        let t0 = Instant::now();
        assert!(!tracker.press(t0, DOUBLE_PRESS_WINDOW));
        assert!(!tracker.press(t0 + ms(500), DOUBLE_PRESS_WINDOW));
        assert!(!tracker.press(t0 + ms(1100), DOUBLE_PRESS_WINDOW));
        assert!(tracker.press(t0 + ms(1400), DOUBLE_PRESS_WINDOW));
    }

    #[test]
    fn test_trackers_are_independent() {
        let mut trackers = GestureTrackers::default();
        let t0 = Instant::now();
        assert!(!trackers.press(Gesture::CtrlDelete, t0));
        assert!(!trackers.press(Gesture::ShiftDelete, t0 + ms(100)));
        assert!(trackers.press(Gesture::CtrlDelete, t0 + ms(150)));
        assert!(trackers.shift_delete.is_armed());
    }
}
