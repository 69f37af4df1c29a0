//! Terminal input, reduced to the keys the editor understands.
//!
//! [`EventSource`] is the one suspension point of the input loop: it waits
//! for at most `timeout` and returns `None` when nothing arrived.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Key(Key),
    /// Bracketed paste.
    Paste(String),
    /// New terminal size as (columns, rows).
    Resize(u16, u16),
    /// Ctrl-C.
    Interrupt,
}

pub trait EventSource: Send {
    /// Wait up to `timeout` for the next event.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<TuiEvent>>;
}

/// Events from the real terminal via crossterm.
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<TuiEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(translate(event::read()?))
    }
}

/// Map a crossterm event onto a [`TuiEvent`]. Key releases and repeats are
/// dropped, as are keys the editor has no use for.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => translate_key(key_event),
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(columns, rows) => Some(TuiEvent::Resize(columns, rows)),
        _ => None,
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    let key = match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(TuiEvent::Interrupt),
        (KeyModifiers::CONTROL, KeyCode::Char(c)) => Key::Ctrl(c),
        (_, KeyCode::Char(c)) => Key::Char(c),
        (_, KeyCode::Enter) => Key::Enter,
        (_, KeyCode::Esc) => Key::Esc,
        (_, KeyCode::Backspace) => Key::Backspace,
        (_, KeyCode::Delete) => Key::Delete,
        (_, KeyCode::Left) => Key::Left,
        (_, KeyCode::Right) => Key::Right,
        (_, KeyCode::Up) => Key::Up,
        (_, KeyCode::Down) => Key::Down,
        (_, KeyCode::Home) => Key::Home,
        (_, KeyCode::End) => Key::End,
        (_, KeyCode::PageUp) => Key::PageUp,
        (_, KeyCode::PageDown) => Key::PageDown,
        _ => return None,
    };
    Some(TuiEvent::Key(key))
}
