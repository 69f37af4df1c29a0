//! # Layout
//!
//! The compositor's geometry: a pane tree that splits the chat area into
//! leaves, border decorations, and a stack of floating overlays.
//!
//! ```text
//! PaneTree (arena)                     PanelStack
//! ┌───────────────────────────────┐    ┌───────────┐  position 0 = top
//! │ #0 Split(Vertical)            │    │  help     │  (painted last)
//! │ ├── #1 Leaf  ─► SharedContent │    ├───────────┤
//! │ └── #2 Split(Horizontal)      │    │  float #1 │
//! │     ├── #3 Leaf               │    └───────────┘
//! │     └── #4 Leaf   (active)    │
//! └───────────────────────────────┘
//! ```
//!
//! Every write lands in a ratatui `Buffer`; only the screen flushes it.

pub mod border;
pub mod paint;
pub mod pane;
pub mod panel;
pub mod sizing;

use std::fmt;

pub use border::{Border, Edge};
pub use pane::{PaneId, PaneTree, ScrollOffset};
pub use panel::{Panel, PanelStack};
pub use sizing::Sizing;

/// How a container lays out its children.
///
/// `Horizontal` stacks children top to bottom (a horizontal cut, like vim's
/// `:split`); `Vertical` places them side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// Pane navigation direction (`wup`, `wdn`, `wlf`, `wrt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The container orientation this direction moves within.
    pub fn axis(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Horizontal,
            Direction::Left | Direction::Right => Orientation::Vertical,
        }
    }

    fn step(self) -> isize {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The container can't give every dynamic child at least one cell.
    TooSmall {
        pane: PaneId,
        extent: u16,
        required: u16,
    },
    /// The operation needs a leaf.
    NotALeaf(PaneId),
    /// The operation needs a pane with a parent.
    NoParent(PaneId),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::TooSmall {
                pane,
                extent,
                required,
            } => write!(f, "pane {pane} is too small ({extent} cells, {required} needed)"),
            LayoutError::NotALeaf(pane) => write!(f, "pane {pane} is not a leaf"),
            LayoutError::NoParent(pane) => write!(f, "pane {pane} has no parent to size against"),
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axis() {
        assert_eq!(Direction::Up.axis(), Orientation::Horizontal);
        assert_eq!(Direction::Down.axis(), Orientation::Horizontal);
        assert_eq!(Direction::Left.axis(), Orientation::Vertical);
        assert_eq!(Direction::Right.axis(), Orientation::Vertical);
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::TooSmall {
            pane: PaneId::ROOT,
            extent: 1,
            required: 2,
        };
        assert_eq!(err.to_string(), "pane #0 is too small (1 cells, 2 needed)");
    }
}
