//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use crate::core::config::ResolvedConfig;
use crate::core::content::{SharedContent, TextContainer};
use crate::core::dispatch::Repaint;
use crate::tui::screen::{Screen, ScreenOptions};

/// A surface that only counts what the dispatcher asked of it.
#[derive(Default)]
pub struct CountingSurface {
    pub repaints: AtomicUsize,
    pub busy: AtomicBool,
}

impl Repaint for CountingSurface {
    fn repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
    }

    fn set_busy(&self, busy: bool) -> bool {
        self.busy.swap(busy, Ordering::SeqCst) != busy
    }
}

/// A `width` x `height` screen on a `TestBackend` with default options.
pub fn test_screen(width: u16, height: u16) -> (Screen<TestBackend>, SharedContent) {
    let console = TextContainer::shared(100);
    let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let options = ScreenOptions::from(&ResolvedConfig::default());
    let screen = Screen::new(terminal, console.clone(), options).unwrap();
    (screen, console)
}

/// The rows of a buffer as strings, trailing spaces kept.
pub fn buffer_rows(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}
