//! Structural commands typed after `:` in command mode.

use std::fmt;

use crate::tui::layout::{Direction, Orientation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Split(Orientation),
    Navigate(Direction),
    ScrollUp,
    ScrollDown,
    ScrollLock,
    PaneCount,
    ActivePane,
    Help,
    Float,
    ClosePanel,
    PanelUp,
    PanelDown,
    /// Pin the active pane's size, or make it dynamic again with `None`.
    Resize(Option<u16>),
    Quit,
    Unknown(String),
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorCommand::Split(Orientation::Horizontal) => write!(f, "sp"),
            EditorCommand::Split(Orientation::Vertical) => write!(f, "vsp"),
            EditorCommand::Navigate(Direction::Up) => write!(f, "wup"),
            EditorCommand::Navigate(Direction::Down) => write!(f, "wdn"),
            EditorCommand::Navigate(Direction::Left) => write!(f, "wlf"),
            EditorCommand::Navigate(Direction::Right) => write!(f, "wrt"),
            EditorCommand::ScrollUp => write!(f, "scroll up"),
            EditorCommand::ScrollDown => write!(f, "scroll down"),
            EditorCommand::ScrollLock => write!(f, "scroll lock"),
            EditorCommand::PaneCount => write!(f, "panes"),
            EditorCommand::ActivePane => write!(f, "active"),
            EditorCommand::Help => write!(f, "help"),
            EditorCommand::Float => write!(f, "float"),
            EditorCommand::ClosePanel => write!(f, "close"),
            EditorCommand::PanelUp => write!(f, "stackup"),
            EditorCommand::PanelDown => write!(f, "stackdown"),
            EditorCommand::Resize(Some(size)) => write!(f, "resize {size}"),
            EditorCommand::Resize(None) => write!(f, "resize"),
            EditorCommand::Quit => write!(f, "quit"),
            EditorCommand::Unknown(text) => write!(f, "{text}"),
        }
    }
}

/// Parse a command-buffer line. Returns `None` for a blank line.
pub fn parse_command(line: &str) -> Option<EditorCommand> {
    let mut words = line.split_whitespace();
    let name = words.next()?;
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("sp" | "split", []) => EditorCommand::Split(Orientation::Horizontal),
        ("vsp" | "vsplit", []) => EditorCommand::Split(Orientation::Vertical),
        ("wup", []) => EditorCommand::Navigate(Direction::Up),
        ("wdn", []) => EditorCommand::Navigate(Direction::Down),
        ("wlf", []) => EditorCommand::Navigate(Direction::Left),
        ("wrt", []) => EditorCommand::Navigate(Direction::Right),
        ("panes", []) => EditorCommand::PaneCount,
        ("active", []) => EditorCommand::ActivePane,
        ("help", []) => EditorCommand::Help,
        ("float", []) => EditorCommand::Float,
        ("close", []) => EditorCommand::ClosePanel,
        ("stackup", []) => EditorCommand::PanelUp,
        ("stackdown", []) => EditorCommand::PanelDown,
        ("resize", []) => EditorCommand::Resize(None),
        ("resize", [size]) => match size.parse::<u16>() {
            Ok(size) if size > 0 => EditorCommand::Resize(Some(size)),
            _ => EditorCommand::Unknown(line.trim().to_string()),
        },
        ("q" | "quit", []) => EditorCommand::Quit,
        _ => EditorCommand::Unknown(line.trim().to_string()),
    };
    Some(command)
}
