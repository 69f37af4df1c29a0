use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable piece of screen chrome.
///
/// Components receive their data as props (struct fields) and render into a
/// `Frame` within a given `Rect`. They hold no references into the pane tree;
/// the screen rebuilds their props from its own state before every draw.
///
/// # Mutability
///
/// `render` takes `&mut self` so a component can cache layout work it did
/// during the pass (the entry box remembers its scroll row).
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something driven by terminal events.
pub trait EventHandler {
    /// The type of high-level event this handler emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
