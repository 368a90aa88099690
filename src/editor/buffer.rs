use ropey::{Rope, RopeSlice};

/// Cursor position in the text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in chars within the line.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Editable document text backed by a rope.
///
/// The buffer stores text exactly as loaded: line endings are never
/// normalized, so `text()` of an untouched buffer is byte-identical to the
/// input. Edit methods report whether the text actually changed so the
/// caller can maintain its own modified flag.
pub struct TextBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl TextBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Total number of lines. An empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Whether the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get the content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let keep = line.len_chars() - line_break_len(line);
        Some(line.slice(..keep).to_string())
    }

    /// Length of a line in chars, line ending excluded.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        line.len_chars() - line_break_len(line)
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole content and move the cursor to the start.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::new();
    }

    /// Remove all text.
    pub fn clear(&mut self) {
        self.replace_all("");
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        // A '\n' after a lone '\r' merges into one CRLF break.
        self.set_cursor_char_idx(char_idx + 1);
    }

    /// Insert a string at the cursor position, leaving the cursor after it.
    ///
    /// Returns `false` when `s` is empty.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);
        self.set_cursor_char_idx(char_idx + s.chars().count());
        true
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// At the start of a line this joins it with the previous one, removing
    /// the whole line ending (`\n` or `\r\n`). Returns `true` if text changed.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            let prev_end = self.rope.line_to_char(prev) + prev_len;
            self.rope.remove(prev_end..char_idx);
            self.cursor.line = prev;
            self.cursor.set_col(prev_len);
        } else {
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - 1);
        }
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// At the end of a line this removes the line ending. Returns `true` if
    /// text changed.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);
        let char_idx = self.cursor_char_idx();

        if self.cursor.col < line_len {
            self.rope.remove(char_idx..=char_idx);
            return true;
        }
        if self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let next_start = self.rope.line_to_char(self.cursor.line + 1);
        self.rope.remove(char_idx..next_start);
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    /// Move the cursor up or down by a page of `rows` lines.
    pub fn move_page(&mut self, rows: usize, down: bool) {
        let rows = isize::try_from(rows.max(1)).unwrap_or(isize::MAX);
        self.move_vertical(if down { rows } else { -rows });
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let chars: Vec<char> = self.line_chars(self.cursor.line);
        let mut pos = self.cursor.col.min(chars.len());
        while pos > 0 && !is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.line_chars(self.cursor.line);
        if self.cursor.col >= chars.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let mut pos = self.cursor.col;
        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < chars.len() && !is_word_char(chars[pos]) {
            pos += 1;
        }
        self.cursor.set_col(pos);
    }

    /// Move cursor to a specific line and column, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    fn cursor_char_idx(&self) -> usize {
        let col = self.cursor.col.min(self.line_len(self.cursor.line));
        self.rope.line_to_char(self.cursor.line) + col
    }

    fn set_cursor_char_idx(&mut self, char_idx: usize) {
        let line = self.rope.char_to_line(char_idx);
        self.cursor.line = line;
        self.cursor.set_col(char_idx - self.rope.line_to_char(line));
    }

    fn line_chars(&self, line_idx: usize) -> Vec<char> {
        self.line_at(line_idx)
            .map(|line| line.chars().collect())
            .unwrap_or_default()
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let max_line = self.line_count().saturating_sub(1);
        let target = self.cursor.line.saturating_add_signed(delta).min(max_line);
        if target == self.cursor.line {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(target));
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Number of trailing chars in `line` that make up its line ending.
fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    let last = line.char(len - 1);
    if last == '\n' && len >= 2 && line.char(len - 2) == '\r' {
        return 2;
    }
    usize::from(matches!(
        last,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = TextBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = TextBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = TextBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_crlf_text_is_kept_verbatim() {
        let content = "one\r\ntwo\r\n";
        let buf = TextBuffer::from_text(content);
        assert_eq!(buf.line_at(0), Some("one".to_string()));
        assert_eq!(buf.line_len(0), 3);
        assert_eq!(buf.text(), content);
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = TextBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
        assert_eq!(buf.line_len(7), 0);
    }

    #[test]
    fn test_line_len_counts_chars_not_bytes() {
        let buf = TextBuffer::from_text("héllo\n日本");
        assert_eq!(buf.line_len(0), 5);
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn test_replace_all_resets_cursor() {
        let mut buf = TextBuffer::from_text("abc\ndef");
        buf.move_to_end();
        buf.replace_all("new text");
        assert_eq!(buf.text(), "new text");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buf = TextBuffer::from_text("abc");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = TextBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char_advances_one_column() {
        let mut buf = TextBuffer::from_text("caf");
        buf.move_end();
        buf.insert_char('é');
        buf.insert_char('!');
        assert_eq!(buf.text(), "café!");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_insert_str_multiline_moves_cursor_to_end_of_insert() {
        let mut buf = TextBuffer::from_text("ab");
        buf.move_cursor(Direction::Right);
        assert!(buf.insert_str("1\n22\n333"));
        assert_eq!(buf.text(), "a1\n22\n333b");
        assert_eq!(buf.cursor(), Cursor::at(2, 3));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = TextBuffer::from_text("hello");
        assert!(!buf.insert_str(""));
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = TextBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_removes_multibyte_char() {
        let mut buf = TextBuffer::from_text("añb");
        buf.move_to(0, 2);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = TextBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_removes_whole_crlf() {
        let mut buf = TextBuffer::from_text("ab\r\ncd");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = TextBuffer::from_text("hi");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_next_line() {
        let mut buf = TextBuffer::from_text("ab\r\ncd");
        buf.move_end();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_newline_after_lone_cr_stays_on_text() {
        let mut buf = TextBuffer::from_text("a\rb");
        buf.move_to(1, 0);
        buf.split_line();
        assert_eq!(buf.text(), "a\r\nb");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));

        buf.insert_char('z');
        assert_eq!(buf.text(), "a\r\nzb");
    }

    // --- Movement ---

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = TextBuffer::from_text("a\nb");
        buf.move_cursor(Direction::Right);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_left_wraps_to_previous_line_end() {
        let mut buf = TextBuffer::from_text("abc\nd");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_vertical_movement_remembers_column() {
        let mut buf = TextBuffer::from_text("long line\nab\nanother line");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_move_page_clamps_to_buffer() {
        let mut buf = TextBuffer::from_text("1\n2\n3\n4\n5");
        buf.move_page(3, true);
        assert_eq!(buf.cursor().line, 3);
        buf.move_page(10, true);
        assert_eq!(buf.cursor().line, 4);
        buf.move_page(10, false);
        assert_eq!(buf.cursor().line, 0);
    }

    #[test]
    fn test_word_movement() {
        let mut buf = TextBuffer::from_text("hello, big world");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 7);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 11);
        buf.move_end();
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 11);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        buf.move_to(9, 9);
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_move_to_start_and_end() {
        let mut buf = TextBuffer::from_text("ab\ncde");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 3));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn apply_op(buf: &mut TextBuffer, op: u8, ch: char) {
            match op % 10 {
                0 => buf.insert_char(ch),
                1 => buf.split_line(),
                2 => {
                    buf.delete_back();
                }
                3 => {
                    buf.delete_forward();
                }
                4 => buf.move_cursor(Direction::Up),
                5 => buf.move_cursor(Direction::Down),
                6 => buf.move_cursor(Direction::Left),
                7 => buf.move_cursor(Direction::Right),
                8 => buf.move_word_left(),
                _ => buf.move_word_right(),
            }
        }

        proptest! {
            #[test]
            fn cursor_stays_inside_text(
                text in "[a-z \n]{0,40}",
                ops in prop::collection::vec((any::<u8>(), "[a-z ]"), 0..60),
            ) {
                let mut buf = TextBuffer::from_text(&text);
                for (op, ch) in &ops {
                    let ch = ch.chars().next().unwrap_or('x');
                    apply_op(&mut buf, *op, ch);
                    let cursor = buf.cursor();
                    prop_assert!(cursor.line < buf.line_count());
                    prop_assert!(cursor.col <= buf.line_len(cursor.line));
                }
            }

            #[test]
            fn typing_reproduces_text(text in "[a-zA-Z0-9 #*\n]{0,80}") {
                let mut buf = TextBuffer::empty();
                for ch in text.chars() {
                    buf.insert_char(ch);
                }
                prop_assert_eq!(buf.text(), text);
            }

            #[test]
            fn untouched_buffer_round_trips(text in "(?s).{0,200}") {
                prop_assert_eq!(TextBuffer::from_text(&text).text(), text);
            }
        }
    }
}
