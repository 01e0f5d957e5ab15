use unicode_width::UnicodeWidthChar;

/// Editable text buffer backing the chat input and the form fields.
///
/// Manages the text, the cursor (a byte offset on a char boundary) and the
/// history of submitted entries.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut composer = Self::new();
        composer.set(text);
        composer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True when only whitespace has been typed.
    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replaces the content, placing the cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
        self.reset_history_navigation();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.reset_history_navigation();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Byte offset of the char boundary before the cursor, if any.
    fn previous_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }

    /// Byte offset of the char boundary after the cursor, if any.
    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|ch| self.cursor + ch.len_utf8())
    }

    pub fn backspace(&mut self) {
        if let Some(start) = self.previous_boundary() {
            self.buffer.replace_range(start..self.cursor, "");
            self.cursor = start;
            self.reset_history_navigation();
        }
    }

    pub fn delete(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..end, "");
            self.reset_history_navigation();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.previous_boundary().unwrap_or(0);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary().unwrap_or(self.buffer.len());
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor = self.buffer[..self.cursor]
            .rfind('\n')
            .map_or(0, |pos| pos + 1);
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor = self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |pos| self.cursor + pos);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.reset_history_navigation();
    }

    /// Empties the buffer and returns what was typed; non-blank entries are
    /// remembered for [`history_previous`](Self::history_previous).
    pub fn take(&mut self) -> String {
        let content = std::mem::take(&mut self.buffer);
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.cursor = 0;
        self.reset_history_navigation();
        content
    }

    /// Recalls the previous submission; returns false when there is none.
    pub fn history_previous(&mut self) -> bool {
        let target = match self.history_index {
            Some(idx) => idx.saturating_sub(1),
            None if self.history.is_empty() => return false,
            None => self.history.len() - 1,
        };
        self.recall(target)
    }

    /// Steps forward through history, ending on an empty buffer.
    pub fn history_next(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let next = self.history_index.map(|idx| idx + 1);
        match next {
            Some(idx) if idx < self.history.len() => self.recall(idx),
            _ => {
                self.history_index = None;
                self.buffer.clear();
                self.cursor = 0;
                true
            }
        }
    }

    fn recall(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };
        self.buffer.clone_from(entry);
        self.cursor = self.buffer.len();
        self.history_index = Some(index);
        true
    }

    fn reset_history_navigation(&mut self) {
        self.history_index = None;
    }

    /// Cell position `(col, row)` of the cursor inside a box `width` cells
    /// wide, counting explicit newlines and soft wraps.
    pub fn cursor_display_position(&self, width: usize) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let (col, row) = self.buffer[..self.cursor]
            .chars()
            .fold((0usize, 0usize), |(col, row), ch| {
                if ch == '\n' {
                    return (0, row + 1);
                }
                let cells = UnicodeWidthChar::width(ch).unwrap_or(1).max(1);
                let (col, row) = if col + cells > width { (0, row + 1) } else { (col, row) };
                let col = col + cells;
                if col >= width { (0, row + 1) } else { (col, row) }
            });
        (col as u16, row as u16)
    }
}
