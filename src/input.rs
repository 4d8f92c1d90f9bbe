//! Text state for the cell editor
//!
//! A single caret with an optional selection over a `String`, with undo/redo.
//! Offsets are in characters. Multi-line inputs (text areas) additionally
//! answer "is the caret on the first/last line" so vertical arrow keys can
//! leave the editor at the boundary.

/// Snapshot used by the undo/redo stacks
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text: String,
    cursor: usize,
    anchor: usize,
}

/// Undo/redo stacks of whole-text snapshots
#[derive(Debug, Clone, Default)]
struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    const MAX: usize = 200;

    fn push(&mut self, snapshot: Snapshot) {
        self.redo.clear();
        self.undo.push(snapshot);
        if self.undo.len() > Self::MAX {
            self.undo.remove(0);
        }
    }
}

/// Editable text with a caret and selection
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    cursor: usize,
    anchor: usize,
    multiline: bool,
    max_length: Option<usize>,
    history: History,
}

impl TextInput {
    /// Create an input holding `text` with the caret at the end
    pub fn new(text: &str, multiline: bool) -> Self {
        let len = text.chars().count();
        Self {
            text: text.to_string(),
            cursor: len,
            anchor: len,
            multiline,
            max_length: None,
            history: History::default(),
        }
    }

    /// Limit insertions to `max` characters (like `maxlength`)
    pub fn with_max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn has_selection(&self) -> bool {
        self.cursor != self.anchor
    }

    /// Selected character range (start <= end)
    pub fn selection(&self) -> (usize, usize) {
        (self.cursor.min(self.anchor), self.cursor.max(self.anchor))
    }

    pub fn selected_text(&self) -> String {
        let (start, end) = self.selection();
        self.text.chars().skip(start).take(end - start).collect()
    }

    /// Caret at offset 0 with nothing selected
    pub fn is_at_start(&self) -> bool {
        !self.has_selection() && self.cursor == 0
    }

    /// Caret after the last character with nothing selected
    pub fn is_at_end(&self) -> bool {
        !self.has_selection() && self.cursor == self.len_chars()
    }

    /// Caret on the first line (always true for single-line inputs)
    pub fn is_on_first_line(&self) -> bool {
        !self.text.chars().take(self.cursor).any(|c| c == '\n')
    }

    /// Caret on the last line (always true for single-line inputs)
    pub fn is_on_last_line(&self) -> bool {
        !self.text.chars().skip(self.cursor).any(|c| c == '\n')
    }

    /// Replace everything, as when a host reports the element's value
    pub fn set_value(&mut self, text: &str, cursor: Option<usize>) {
        self.record();
        self.text = text.to_string();
        let len = self.len_chars();
        self.cursor = cursor.unwrap_or(len).min(len);
        self.anchor = self.cursor;
    }

    // === Movement ===

    pub fn move_left(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            self.cursor = self.selection().0;
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.finish_move(extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            self.cursor = self.selection().1;
        } else if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
        self.finish_move(extend);
    }

    /// Start of the current line (start of text for single-line inputs)
    pub fn move_home(&mut self, extend: bool) {
        self.cursor = self.line_start(self.cursor);
        self.finish_move(extend);
    }

    /// End of the current line
    pub fn move_end(&mut self, extend: bool) {
        self.cursor = self.line_end(self.cursor);
        self.finish_move(extend);
    }

    /// Up one line keeping the column; on the first line go to the start
    pub fn move_up(&mut self, extend: bool) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            self.cursor = 0;
        } else {
            let column = self.cursor - start;
            let prev_start = self.line_start(start - 1);
            let prev_len = start - 1 - prev_start;
            self.cursor = prev_start + column.min(prev_len);
        }
        self.finish_move(extend);
    }

    /// Down one line keeping the column; on the last line go to the end
    pub fn move_down(&mut self, extend: bool) {
        let end = self.line_end(self.cursor);
        let len = self.len_chars();
        if end >= len {
            self.cursor = len;
        } else {
            let column = self.cursor - self.line_start(self.cursor);
            let next_start = end + 1;
            let next_len = self.line_end(next_start) - next_start;
            self.cursor = next_start + column.min(next_len);
        }
        self.finish_move(extend);
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.cursor = self.len_chars();
    }

    // === Editing ===

    /// Insert a character, replacing the selection. Returns false if refused.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' && !self.multiline {
            return false;
        }
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf))
    }

    /// Insert text (newlines dropped for single-line inputs)
    pub fn insert_text(&mut self, text: &str) -> bool {
        let filtered: String = if self.multiline {
            text.to_string()
        } else {
            text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
        };
        if filtered.is_empty() {
            return false;
        }

        let (start, end) = self.selection();
        let insert_len = filtered.chars().count();
        if let Some(max) = self.max_length {
            if self.len_chars() - (end - start) + insert_len > max {
                return false;
            }
        }

        self.record();
        let start_byte = self.byte_offset(start);
        let end_byte = self.byte_offset(end);
        self.text.replace_range(start_byte..end_byte, &filtered);
        self.cursor = start + insert_len;
        self.anchor = self.cursor;
        true
    }

    /// Backspace
    pub fn delete_backward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        if self.cursor == 0 {
            return false;
        }
        self.record();
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        self.anchor = self.cursor;
        true
    }

    /// Delete
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        if self.cursor >= self.len_chars() {
            return false;
        }
        self.record();
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.undo.pop() else {
            return false;
        };
        self.history.redo.push(self.snapshot());
        self.restore(prev);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo.pop() else {
            return false;
        };
        self.history.undo.push(self.snapshot());
        self.restore(next);
        true
    }

    // === Internals ===

    fn delete_selection(&mut self) -> bool {
        let (start, end) = self.selection();
        self.record();
        let start_byte = self.byte_offset(start);
        let end_byte = self.byte_offset(end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
        self.anchor = start;
        true
    }

    fn finish_move(&mut self, extend: bool) {
        if !extend {
            self.anchor = self.cursor;
        }
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text
            .chars()
            .take(offset)
            .enumerate()
            .filter(|(_, c)| *c == '\n')
            .last()
            .map(|(i, _)| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.text
            .chars()
            .enumerate()
            .skip(offset)
            .find(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.len_chars())
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
            anchor: self.anchor,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor;
        self.anchor = snapshot.anchor;
    }

    fn record(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }
}
