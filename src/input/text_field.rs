//! Text field input handling utilities.
//!
//! The cursor is a byte offset that always sits on a char boundary, so names
//! with multi-byte characters edit correctly.

/// Helper for handling text field input operations.
pub struct TextField;

impl TextField {
    fn prev_boundary(input: &str, cursor: usize) -> usize {
        input[..cursor].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
    }

    fn next_boundary(input: &str, cursor: usize) -> usize {
        input[cursor..].chars().next().map(|c| cursor + c.len_utf8()).unwrap_or(cursor)
    }

    /// Handle backspace key - delete character before cursor
    pub fn backspace(input: &mut String, cursor: &mut usize) {
        if *cursor > 0 {
            let start = Self::prev_boundary(input, *cursor);
            input.replace_range(start..*cursor, "");
            *cursor = start;
        }
    }

    /// Handle delete key - delete character at cursor
    pub fn delete(input: &mut String, cursor: usize) {
        if cursor < input.len() {
            let end = Self::next_boundary(input, cursor);
            input.replace_range(cursor..end, "");
        }
    }

    /// Delete back to the start of the previous word (Ctrl+W)
    pub fn delete_word(input: &mut String, cursor: &mut usize) {
        let before = &input[..*cursor];
        let trimmed = before.trim_end_matches(|c: char| c == ' ' || c == '/');
        let start = trimmed
            .rfind(|c: char| c == ' ' || c == '/')
            .map(|i| i + 1)
            .unwrap_or(0);
        input.replace_range(start..*cursor, "");
        *cursor = start;
    }

    /// Delete everything before the cursor (Ctrl+U)
    pub fn delete_to_start(input: &mut String, cursor: &mut usize) {
        input.replace_range(..*cursor, "");
        *cursor = 0;
    }

    pub fn left(input: &str, cursor: &mut usize) {
        *cursor = Self::prev_boundary(input, *cursor);
    }

    pub fn right(input: &str, cursor: &mut usize) {
        *cursor = Self::next_boundary(input, *cursor);
    }

    pub fn home(cursor: &mut usize) {
        *cursor = 0;
    }

    pub fn end(input: &str, cursor: &mut usize) {
        *cursor = input.len();
    }

    /// Handle character input - insert at cursor
    pub fn insert_char(input: &mut String, cursor: &mut usize, c: char) {
        input.insert(*cursor, c);
        *cursor += c.len_utf8();
    }

    /// Screen column of the cursor
    pub fn display_column(input: &str, cursor: usize) -> usize {
        input[..cursor].chars().count()
    }
}
