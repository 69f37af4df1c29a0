//! # EntryBox Component
//!
//! The editor's line, drawn at the bottom of the screen under a top border.
//!
//! ## Wrapping
//!
//! The text is cut into rows of exactly `width` characters rather than at
//! word boundaries, so the cursor's row and column follow directly from its
//! character index. When the line needs more rows than the box has, the
//! view scrolls just enough to keep the cursor row visible.
//!
//! ## Props and State
//!
//! - `text`, `cursor`: props from the editor (cursor is a byte offset)
//! - `scroll`: internal, the first visible row, kept across renders

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::tui::component::Component;
use crate::tui::layout::paint::paint_block;
use crate::tui::layout::{Border, Edge};

#[derive(Debug, Default)]
pub struct EntryBox {
    pub text: String,
    pub cursor: usize,
    scroll: u16,
}

impl EntryBox {
    pub fn new() -> Self {
        Self::default()
    }

    fn border() -> Border {
        Border::new(&[Edge::Top]).style(Style::default().fg(Color::DarkGray))
    }

    /// `text` as rows of `width` characters. Always at least one row.
    fn rows(&self, width: u16) -> Vec<String> {
        let chars: Vec<char> = self.text.chars().collect();
        let mut rows: Vec<String> = chars
            .chunks(width.max(1) as usize)
            .map(|chunk| chunk.iter().collect())
            .collect();
        // A cursor sitting right after a full row starts a new one.
        if rows.is_empty() || chars.len() % width.max(1) as usize == 0 {
            rows.push(String::new());
        }
        rows
    }

    /// (row, column) of the cursor inside unscrolled text of `width`.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let width = width.max(1) as usize;
        let index = self.text[..self.cursor.min(self.text.len())].chars().count();
        ((index / width) as u16, (index % width) as u16)
    }

    /// Scroll so the cursor row is among the `height` visible rows.
    fn follow_cursor(&mut self, width: u16, height: u16) {
        let (row, _) = self.cursor_cell(width);
        if row < self.scroll {
            self.scroll = row;
        } else if height > 0 && row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }

    /// Terminal cursor position for a box drawn at `area`.
    pub fn screen_pos(&self, area: Rect) -> (u16, u16) {
        let inner = Self::border().inset(area);
        let (row, col) = self.cursor_cell(inner.width);
        (inner.x + col, inner.y + row.saturating_sub(self.scroll))
    }
}

impl Component for EntryBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = Self::border();
        let inner = border.inset(area);
        border.render(area, frame.buffer_mut());
        if inner.is_empty() {
            return;
        }

        self.follow_cursor(inner.width, inner.height);
        let rows: Vec<String> = self
            .rows(inner.width)
            .into_iter()
            .skip(self.scroll as usize)
            .collect();
        if let Err(e) = paint_block(frame.buffer_mut(), inner, &rows, Style::default()) {
            log::warn!("Entry box skipped this pass: {}", e);
            return;
        }
        frame.set_cursor_position(self.screen_pos(area));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_rows;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn entry(text: &str) -> EntryBox {
        EntryBox {
            text: text.to_string(),
            cursor: text.len(),
            scroll: 0,
        }
    }

    fn draw(entry: &mut EntryBox, width: u16, height: u16) -> (Vec<String>, (u16, u16)) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| entry.render(f, f.area())).unwrap();
        let rows = buffer_rows(terminal.backend().buffer());
        let cursor = terminal.get_cursor_position().unwrap();
        (rows, (cursor.x, cursor.y))
    }

    #[test]
    fn test_border_on_top_text_below() {
        let (rows, cursor) = draw(&mut entry("hi"), 6, 3);
        assert_eq!(rows, vec!["──────", "hi    ", "      "]);
        assert_eq!(cursor, (2, 1));
    }

    #[test]
    fn test_long_line_wraps_by_width() {
        let (rows, cursor) = draw(&mut entry("abcdefg"), 4, 3);
        assert_eq!(rows, vec!["────", "abcd", "efg "]);
        assert_eq!(cursor, (3, 2));
    }

    #[test]
    fn test_cursor_after_full_row_starts_next_row() {
        let (rows, cursor) = draw(&mut entry("abcd"), 4, 3);
        assert_eq!(rows[1], "abcd");
        assert_eq!(cursor, (0, 2));
    }

    #[test]
    fn test_scrolls_to_keep_cursor_visible() {
        let mut entry = entry("abcdefghij");
        let (rows, cursor) = draw(&mut entry, 4, 3);
        assert_eq!(rows, vec!["────", "efgh", "ij  "]);
        assert_eq!(cursor, (2, 2));

        entry.cursor = 0;
        let (rows, cursor) = draw(&mut entry, 4, 3);
        assert_eq!(rows, vec!["────", "abcd", "efgh"]);
        assert_eq!(cursor, (0, 1));
    }

    #[test]
    fn test_cursor_counts_chars_not_bytes() {
        let mut entry = entry("café");
        entry.cursor = "caf".len();
        assert_eq!(entry.screen_pos(Rect::new(0, 0, 10, 3)), (3, 1));
    }
}
