//! # Panel Stack
//!
//! Overlays that float above the pane tree, kept in z-order. Position 0 is
//! the top of the stack and is painted last.
//!
//! The stack never holds the same entry twice: adding an entry that is
//! already present raises it instead.

use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use super::border::Border;
use super::paint::{RenderError, paint_block, visible_lines};
use super::pane::ScrollOffset;
use crate::core::content::{SharedContent, TextContainer};

#[derive(Debug)]
pub struct PanelStack<T> {
    entries: VecDeque<T>,
}

impl<T> Default for PanelStack<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<T: PartialEq> PanelStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `entry` on top. An entry already in the stack is moved to the top.
    pub fn addwin(&mut self, entry: T) {
        if let Some(index) = self.entries.iter().position(|e| *e == entry) {
            self.entries.remove(index);
        }
        self.entries.push_front(entry);
    }

    /// Pop the top entry, if there is one.
    ///
    /// The stack doesn't draw; the caller repaints so the entries below show
    /// through.
    pub fn removewin(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    /// Send the top entry to the bottom.
    pub fn up(&mut self) {
        if self.entries.len() >= 2 {
            self.entries.rotate_left(1);
        }
    }

    /// Bring the bottom entry to the top.
    pub fn down(&mut self) {
        if self.entries.len() >= 2 {
            self.entries.rotate_right(1);
        }
    }

    pub fn top(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Entries in paint order: bottom first, top last.
    pub fn paint_order(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }
}

const HELP_TEXT: &[&str] = &[
    "Insert mode",
    "  Enter      send line (/cmd runs a command)",
    "  Esc        command mode",
    "Command mode",
    "  i          insert mode",
    "  h / l      move cursor",
    "  k / j      scroll back / forward",
    "  G          follow newest",
    "  Ctrl-W hjkl  focus pane",
    "  :sp :vsp   split",
    "  :resize N  pin pane size",
    "  :float :close :stackup :stackdown",
    "  :panes :active :q",
];

/// A floating window: a bordered box showing a content source.
#[derive(Clone)]
pub struct Panel {
    title: String,
    content: SharedContent,
    cascade: u16,
}

impl PartialEq for Panel {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && Arc::ptr_eq(&self.content, &other.content)
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("title", &self.title)
            .field("cascade", &self.cascade)
            .finish_non_exhaustive()
    }
}

impl Panel {
    pub fn new(title: impl Into<String>, content: SharedContent) -> Self {
        Self {
            title: title.into(),
            content,
            cascade: 0,
        }
    }

    /// The key-binding reference.
    pub fn help() -> Self {
        let content = TextContainer::shared(HELP_TEXT.len());
        for line in HELP_TEXT {
            content.append((*line).to_string());
        }
        Self::new("help", content)
    }

    /// A panel following `content`, shifted `cascade` cells down and right so
    /// stacked mirrors stay distinguishable.
    pub fn mirror(title: impl Into<String>, content: SharedContent, cascade: u16) -> Self {
        Self {
            title: title.into(),
            content,
            cascade,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &SharedContent {
        &self.content
    }

    /// Where the panel sits on a `screen`: centred at about two thirds of
    /// each dimension, then cascaded.
    pub fn area(&self, screen: Rect) -> Rect {
        let width = (screen.width * 2 / 3).max(screen.width.min(12));
        let height = (screen.height * 2 / 3).max(screen.height.min(4));
        let x = screen.x + (screen.width - width) / 2;
        let y = screen.y + (screen.height - height) / 2;
        let shift_x = self.cascade.min(screen.right().saturating_sub(x + width));
        let shift_y = self.cascade.min(screen.bottom().saturating_sub(y + height));
        Rect::new(x + shift_x, y + shift_y, width, height)
    }

    /// Paint over whatever is under `area`: border first, then content.
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Result<(), RenderError> {
        let border = Border::all()
            .title(self.title.clone())
            .style(Style::default().fg(Color::Cyan));
        border.render(area, buf);
        let inner = border.inset(area);
        let rows = visible_lines(
            &self.content.snapshot(),
            ScrollOffset::Auto,
            inner.width,
            inner.height,
            "  ",
        );
        debug!("Panel '{}' painting {} rows at {}", self.title, rows.len(), inner);
        paint_block(buf, inner, &rows, Style::default())
    }
}
