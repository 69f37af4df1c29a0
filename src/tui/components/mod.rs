//! # TUI Components
//!
//! Screen chrome drawn around the pane tree. Both components follow the
//! props-in-struct pattern of [`Component`](crate::tui::component::Component):
//! the screen fills in their fields from its own state right before each
//! draw, so neither holds a reference to anything shared.
//!
//! ```text
//! components/
//! ├── mod.rs         (this file)
//! ├── status_bar.rs  (busy/idle fill, mode, status message, clock)
//! └── entry_box.rs   (editor line under a top border, cursor placement)
//! ```

mod entry_box;
mod status_bar;

pub use entry_box::EntryBox;
pub use status_bar::StatusBar;
