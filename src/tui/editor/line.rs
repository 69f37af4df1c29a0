//! The single-line insert buffer and its cursor.

use crate::tui::text_wrap::{next_char_boundary, prev_char_boundary};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    /// Cursor as a byte offset into `text` (0..=text.len()).
    pos: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.pos, c);
        self.pos += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.pos, s);
        self.pos += s.len();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.text, self.pos);
        self.text.drain(prev..self.pos);
        self.pos = prev;
        true
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.pos >= self.text.len() {
            return false;
        }
        let next = next_char_boundary(&self.text, self.pos);
        self.text.drain(self.pos..next);
        true
    }

    pub fn left(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = prev_char_boundary(&self.text, self.pos);
        true
    }

    pub fn right(&mut self) -> bool {
        if self.pos >= self.text.len() {
            return false;
        }
        self.pos = next_char_boundary(&self.text, self.pos);
        true
    }

    pub fn home(&mut self) -> bool {
        let moved = self.pos != 0;
        self.pos = 0;
        moved
    }

    pub fn end(&mut self) -> bool {
        let moved = self.pos != self.text.len();
        self.pos = self.text.len();
        moved
    }

    /// Empty the buffer and return what it held.
    pub fn take(&mut self) -> String {
        self.pos = 0;
        std::mem::take(&mut self.text)
    }
}
