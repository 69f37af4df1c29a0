//! # Modal Editor
//!
//! A two-mode line editor driven one key at a time.
//!
//! ## Modes
//!
//! - **Insert**: printable keys edit the line, Enter submits it, Esc switches
//!   to command mode
//! - **Command**: keys are bindings (`i`, `h`/`l`, `k`/`j`, `G`, Ctrl-W
//!   prefix) and `:` opens a command buffer that Enter parses into an
//!   [`EditorCommand`]
//!
//! Every key is first looked up in a transition table keyed by the current
//! state and the key, and the resulting transition is then applied. The
//! editor never touches the pane tree itself; structural work comes back to
//! the caller as an [`EditorAction`].

mod command;
mod line;

use log::debug;

pub use command::{EditorCommand, parse_command};
pub use line::LineBuffer;

use crate::tui::component::EventHandler;
use crate::tui::event::{Key, TuiEvent};
use crate::tui::layout::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Insert,
    Command,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Insert => write!(f, "INSERT"),
            Mode::Command => write!(f, "COMMAND"),
        }
    }
}

/// What the caller should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Redraw,
    /// A finished insert-mode line, unsanitised.
    Submit(String),
    Command(EditorCommand),
}

/// Where a key lands, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Insert,
    Command,
    /// Command mode after Ctrl-W, waiting for a direction.
    Prefix,
    /// Command mode with the `:` buffer open.
    Buffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Type(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Submit,
    ToCommand,
    ToInsert,
    ArmPrefix,
    Navigate(Direction),
    Scroll(Key),
    OpenBuffer,
    BufferType(char),
    BufferBackspace,
    BufferSubmit,
    BufferCancel,
    Ignore,
}

/// The transition table.
fn transition(state: State, key: Key) -> Transition {
    use Transition as T;
    match (state, key) {
        (State::Insert, Key::Char(c)) => T::Type(c),
        (State::Insert, Key::Backspace) => T::Backspace,
        (State::Insert, Key::Delete) => T::Delete,
        (State::Insert, Key::Left) => T::Left,
        (State::Insert, Key::Right) => T::Right,
        (State::Insert, Key::Home) => T::Home,
        (State::Insert, Key::End) => T::End,
        (State::Insert, Key::Enter) => T::Submit,
        (State::Insert, Key::Esc) => T::ToCommand,
        (State::Insert | State::Command, Key::PageUp | Key::PageDown) => T::Scroll(key),

        (State::Command, Key::Char('i')) => T::ToInsert,
        (State::Command, Key::Char(':')) => T::OpenBuffer,
        (State::Command, Key::Char('h') | Key::Left) => T::Left,
        (State::Command, Key::Char('l') | Key::Right) => T::Right,
        (State::Command, Key::Char('0') | Key::Home) => T::Home,
        (State::Command, Key::Char('$') | Key::End) => T::End,
        (State::Command, Key::Char('k' | 'j' | 'G') | Key::Up | Key::Down) => T::Scroll(key),
        (State::Command, Key::Char('x') | Key::Delete) => T::Delete,
        (State::Command, Key::Ctrl('w')) => T::ArmPrefix,

        (State::Prefix, Key::Char('k') | Key::Up) => T::Navigate(Direction::Up),
        (State::Prefix, Key::Char('j') | Key::Down) => T::Navigate(Direction::Down),
        (State::Prefix, Key::Char('h') | Key::Left) => T::Navigate(Direction::Left),
        (State::Prefix, Key::Char('l') | Key::Right) => T::Navigate(Direction::Right),
        (State::Prefix, _) => T::ToCommand,

        (State::Buffer, Key::Char(c)) => T::BufferType(c),
        (State::Buffer, Key::Backspace) => T::BufferBackspace,
        (State::Buffer, Key::Enter) => T::BufferSubmit,
        (State::Buffer, Key::Esc) => T::BufferCancel,

        _ => T::Ignore,
    }
}

#[derive(Debug, Default)]
pub struct ModalEditor {
    mode: Mode,
    line: LineBuffer,
    /// Open `:` buffer, command mode only.
    command: Option<String>,
    prefix: bool,
}

impl ModalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn command_buffer(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn prefix_pending(&self) -> bool {
        self.prefix
    }

    /// What the entry box shows, with the cursor as a byte offset into it.
    pub fn display(&self) -> (String, usize) {
        match &self.command {
            Some(buffer) => (format!(":{buffer}"), buffer.len() + 1),
            None => (self.line.text().to_string(), self.line.cursor()),
        }
    }

    fn state(&self) -> State {
        match self.mode {
            Mode::Insert => State::Insert,
            Mode::Command if self.command.is_some() => State::Buffer,
            Mode::Command if self.prefix => State::Prefix,
            Mode::Command => State::Command,
        }
    }

    /// Feed one key.
    pub fn handle_key(&mut self, key: Key) -> EditorAction {
        let step = transition(self.state(), key);
        debug!("Editor {:?} + {:?} -> {:?}", self.state(), key, step);
        self.apply(step)
    }

    /// Bracketed paste goes straight into whichever buffer is being typed in.
    pub fn paste(&mut self, text: &str) -> EditorAction {
        match (self.mode, &mut self.command) {
            (Mode::Command, Some(buffer)) => buffer.push_str(text),
            (Mode::Command, None) => return EditorAction::None,
            (Mode::Insert, _) => self.line.insert_str(text),
        }
        EditorAction::Redraw
    }

    fn apply(&mut self, step: Transition) -> EditorAction {
        let redraw_if = |moved: bool| if moved { EditorAction::Redraw } else { EditorAction::None };
        match step {
            Transition::Type(c) => {
                self.line.insert(c);
                EditorAction::Redraw
            }
            Transition::Backspace => redraw_if(self.line.backspace()),
            Transition::Delete => redraw_if(self.line.delete()),
            Transition::Left => redraw_if(self.line.left()),
            Transition::Right => redraw_if(self.line.right()),
            Transition::Home => redraw_if(self.line.home()),
            Transition::End => redraw_if(self.line.end()),
            Transition::Submit => {
                if self.line.text().trim().is_empty() {
                    EditorAction::None
                } else {
                    EditorAction::Submit(self.line.take())
                }
            }
            Transition::ToCommand => {
                self.mode = Mode::Command;
                self.prefix = false;
                EditorAction::Redraw
            }
            Transition::ToInsert => {
                self.mode = Mode::Insert;
                EditorAction::Redraw
            }
            Transition::ArmPrefix => {
                self.prefix = true;
                EditorAction::None
            }
            Transition::Navigate(direction) => {
                self.prefix = false;
                EditorAction::Command(EditorCommand::Navigate(direction))
            }
            Transition::Scroll(key) => EditorAction::Command(match key {
                Key::Char('k') | Key::Up | Key::PageUp => EditorCommand::ScrollUp,
                Key::Char('j') | Key::Down | Key::PageDown => EditorCommand::ScrollDown,
                _ => EditorCommand::ScrollLock,
            }),
            Transition::OpenBuffer => {
                self.command = Some(String::new());
                EditorAction::Redraw
            }
            Transition::BufferType(c) => {
                if let Some(buffer) = &mut self.command {
                    buffer.push(c);
                }
                EditorAction::Redraw
            }
            Transition::BufferBackspace => {
                let removed = self.command.as_mut().and_then(String::pop).is_some();
                redraw_if(removed)
            }
            Transition::BufferSubmit => {
                let buffer = self.command.take().unwrap_or_default();
                match parse_command(&buffer) {
                    Some(command) => EditorAction::Command(command),
                    None => EditorAction::Redraw,
                }
            }
            Transition::BufferCancel => {
                self.command = None;
                EditorAction::Redraw
            }
            Transition::Ignore => EditorAction::None,
        }
    }
}

impl EventHandler for ModalEditor {
    type Event = EditorAction;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<EditorAction> {
        match event {
            TuiEvent::Key(key) => Some(self.handle_key(*key)),
            TuiEvent::Paste(text) => Some(self.paste(text)),
            TuiEvent::Resize(..) | TuiEvent::Interrupt => None,
        }
    }
}
