//! Minimal line-oriented edit buffer backing the text input widgets.
//!
//! Supports typed input, bracketed paste, and basic cursor movement. The
//! cursor column is tracked in characters; display positions account for
//! wide glyphs via `unicode-width`.

use unicode_width::UnicodeWidthStr;

/// Editable text with a cursor. Single-line buffers ignore newlines.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    single_line: bool,
}

impl EditBuffer {
    pub fn multi_line() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            single_line: false,
        }
    }

    pub fn single_line() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            single_line: true,
        }
    }

    /// Full contents with `\n` separators.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True when the buffer contains only whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Cursor position as (row, column-in-characters).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Terminal-cell x offset of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        let line = &self.lines[self.row];
        let byte = char_to_byte(line, self.col);
        UnicodeWidthStr::width(&line[..byte])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.row = 0;
        self.col = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.newline();
            return;
        }
        let line = &mut self.lines[self.row];
        let byte = char_to_byte(line, self.col);
        line.insert(byte, ch);
        self.col += 1;
    }

    /// Insert pasted text, splitting on newlines for multi-line buffers.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\r' => {}
                '\n' if self.single_line => self.insert_char(' '),
                other => self.insert_char(other),
            }
        }
    }

    pub fn newline(&mut self) {
        if self.single_line {
            return;
        }
        let line = &mut self.lines[self.row];
        let byte = char_to_byte(line, self.col);
        let rest = line.split_off(byte);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let line = &mut self.lines[self.row];
            let byte = char_to_byte(line, self.col);
            line.remove(byte);
        } else if self.row > 0 {
            let removed = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
            self.lines[self.row].push_str(&removed);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
        }
    }

    pub fn move_right(&mut self) {
        let len = self.lines[self.row].chars().count();
        if self.col < len {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.clamp_col();
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.lines[self.row].chars().count();
    }

    fn clamp_col(&mut self) {
        let len = self.lines[self.row].chars().count();
        if self.col > len {
            self.col = len;
        }
    }
}

/// Byte offset of the `col`-th character of `line`.
fn char_to_byte(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map(|(idx, _)| idx).unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_newlines() {
        let mut buffer = EditBuffer::multi_line();
        for ch in "ab".chars() {
            buffer.insert_char(ch);
        }
        buffer.newline();
        buffer.insert_char('c');
        assert_eq!(buffer.text(), "ab\nc");
        assert_eq!(buffer.cursor(), (1, 1));
    }

    #[test]
    fn paste_splits_lines_in_multi_line_buffers() {
        let mut buffer = EditBuffer::multi_line();
        buffer.insert_str("one\r\ntwo");
        assert_eq!(buffer.text(), "one\ntwo");
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn single_line_buffers_flatten_newlines() {
        let mut buffer = EditBuffer::single_line();
        buffer.insert_str("a\nb");
        assert_eq!(buffer.text(), "a b");
        buffer.newline();
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buffer = EditBuffer::multi_line();
        buffer.insert_str("ab\ncd");
        buffer.move_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn cursor_movement_clamps_to_line_ends() {
        let mut buffer = EditBuffer::multi_line();
        buffer.insert_str("long line\nx");
        buffer.move_up();
        buffer.move_end();
        assert_eq!(buffer.cursor(), (0, 9));
        buffer.move_down();
        assert_eq!(buffer.cursor(), (1, 1));
    }

    #[test]
    fn wide_characters_affect_display_column_only() {
        let mut buffer = EditBuffer::single_line();
        buffer.insert_str("日本");
        assert_eq!(buffer.cursor(), (0, 2));
        assert_eq!(buffer.cursor_display_col(), 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut buffer = EditBuffer::multi_line();
        buffer.insert_str("text\nmore");
        buffer.clear();
        assert!(buffer.is_blank());
        assert_eq!(buffer.cursor(), (0, 0));
    }
}
