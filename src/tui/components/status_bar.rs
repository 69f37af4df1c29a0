//! # StatusBar Component
//!
//! The single row between the panes and the entry box.
//!
//! ## Layout
//!
//! The row is filled with the busy glyph (`*` by default) while a message is
//! being delivered and with the idle glyph (`-`) otherwise. Centred on top of
//! the fill sits
//!
//! ```text
//! ------ COMMAND | Unknown command: foo | #3 | 14:02 ------
//! ```
//!
//! The status message segment is left out when there is no message. On a
//! terminal narrower than the text, the text is cut on the right.
//!
//! ## Stateless
//!
//! Every field is a prop set by the screen right before the draw.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::editor::Mode;
use crate::tui::layout::PaneId;

pub struct StatusBar {
    pub mode: Mode,
    pub message: String,
    pub active: PaneId,
    pub clock: String,
    pub busy: bool,
    pub busy_fill: char,
    pub idle_fill: char,
}

impl StatusBar {
    /// The centred text, without fill.
    pub fn text(&self) -> String {
        let mut parts = vec![self.mode.to_string()];
        if !self.message.is_empty() {
            parts.push(self.message.clone());
        }
        parts.push(self.active.to_string());
        parts.push(self.clock.clone());
        format!(" {} ", parts.join(" | "))
    }

    fn fill(&self) -> char {
        if self.busy { self.busy_fill } else { self.idle_fill }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let style = if self.busy {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let buf = frame.buffer_mut();
        let fill: String = std::iter::repeat_n(self.fill(), area.width as usize).collect();
        buf.set_stringn(area.x, area.y, &fill, area.width as usize, style);

        let text = self.text();
        let text_width = (text.width() as u16).min(area.width);
        let x = area.x + (area.width - text_width) / 2;
        buf.set_stringn(x, area.y, &text, text_width as usize, Style::default());
    }
}
