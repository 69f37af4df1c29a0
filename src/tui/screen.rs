//! # Screen
//!
//! Everything that ends up on the terminal, in one place:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ PaneTree        PanelStack   │  chat area (rows 0 .. h-entry-1)
//! │                              │
//! ├──── INSERT | #2 | 14:02 ─────┤  status bar (1 row)
//! │──────────────────────────────│  entry box (entry_height rows)
//! │ typed text_                  │
//! └──────────────────────────────┘
//! ```
//!
//! A [`Screen`] is only ever reached through a [`RenderLock`]. Holding the
//! lock is what makes it safe to read geometry, change the tree or flush;
//! content sources have their own inner locks and can be appended to
//! without it.
//!
//! [`Screen::repaint`] recomputes the full visible state from the content
//! sources and flushes it with a single `Terminal::draw`, so repaints from
//! different tasks can't leave a half-drawn frame behind.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::config::ResolvedConfig;
use crate::core::content::{SharedContent, TextContainer};
use crate::core::dispatch::Repaint;
use crate::tui::component::Component;
use crate::tui::components::{EntryBox, StatusBar};
use crate::tui::editor::{EditorCommand, ModalEditor};
use crate::tui::layout::{Panel, PanelStack, PaneTree};

#[derive(Debug)]
pub enum ScreenError {
    /// The terminal backend failed (size query, draw, flush).
    Backend(String),
    /// Reading terminal input failed.
    Input(io::Error),
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::Backend(e) => write!(f, "terminal error: {e}"),
            ScreenError::Input(e) => write!(f, "input error: {e}"),
        }
    }
}

impl std::error::Error for ScreenError {}

impl From<io::Error> for ScreenError {
    fn from(e: io::Error) -> Self {
        ScreenError::Input(e)
    }
}

/// Presentation settings taken from the resolved config.
#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub entry_height: u16,
    pub continuation_indent: String,
    pub busy_fill: char,
    pub idle_fill: char,
    pub history_length: usize,
}

impl From<&ResolvedConfig> for ScreenOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            entry_height: config.entry_height,
            continuation_indent: config.continuation_indent.clone(),
            busy_fill: config.busy_fill,
            idle_fill: config.idle_fill,
            history_length: config.history_length,
        }
    }
}

/// Whether the input loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split the terminal into chat area, status row and entry box.
fn regions(area: Rect, entry_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Min(0), Length(1), Length(entry_height)]).areas(area)
}

pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    tree: PaneTree,
    panels: PanelStack<Panel>,
    editor: ModalEditor,
    entry: EntryBox,
    options: ScreenOptions,
    status: String,
    clock: String,
    busy: bool,
}

impl<B: Backend> Screen<B> {
    /// Lay out a single pane showing `console` over the whole chat area.
    pub fn new(terminal: Terminal<B>, console: SharedContent, options: ScreenOptions) -> Result<Self, ScreenError> {
        let size = terminal.size().map_err(|e| ScreenError::Backend(e.to_string()))?;
        let [chat, _, _] = regions(Rect::new(0, 0, size.width, size.height), options.entry_height);
        let tree = PaneTree::new(chat, console).with_indent(options.continuation_indent.clone());
        info!("Screen {}x{}, chat area {}", size.width, size.height, chat);

        Ok(Self {
            terminal,
            tree,
            panels: PanelStack::new(),
            editor: ModalEditor::new(),
            entry: EntryBox::new(),
            options,
            status: String::new(),
            clock: String::new(),
            busy: false,
        })
    }

    pub fn tree(&self) -> &PaneTree {
        &self.tree
    }

    pub fn panels(&self) -> &PanelStack<Panel> {
        &self.panels
    }

    pub fn editor(&self) -> &ModalEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ModalEditor {
        &mut self.editor
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// Returns `true` if the displayed clock text changed.
    pub fn set_clock(&mut self, clock: impl Into<String>) -> bool {
        let clock = clock.into();
        if clock == self.clock {
            return false;
        }
        self.clock = clock;
        true
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Returns `true` if the indicator changed.
    pub fn set_busy(&mut self, busy: bool) -> bool {
        std::mem::replace(&mut self.busy, busy) != busy
    }

    /// Content of the active leaf.
    pub fn active_content(&self) -> SharedContent {
        self.tree.active_content()
    }

    /// Re-derive the pane tree's rectangle from a terminal of `width` x `height`.
    pub fn relayout(&mut self, width: u16, height: u16) {
        let [chat, _, _] = regions(Rect::new(0, 0, width, height), self.options.entry_height);
        debug!("Relayout to {}x{}, chat area {}", width, height, chat);
        self.tree.set_area(chat);
    }

    /// Terminal resize: new root rectangle, resized tree, full repaint.
    ///
    /// The terminal's own buffers follow the backend size on the next draw.
    pub fn handle_resize(&mut self, width: u16, height: u16) -> Result<(), ScreenError> {
        self.relayout(width, height);
        self.terminal
            .clear()
            .map_err(|e| ScreenError::Backend(e.to_string()))?;
        self.repaint()
    }

    /// Ask every visible content source whether it changed. Clears all flags.
    pub fn take_changed(&self) -> bool {
        let panels_changed = self
            .panels
            .iter()
            .fold(false, |changed, panel| changed | panel.content().changed());
        self.tree.take_changed() | panels_changed
    }

    /// Compose the whole screen and flush it once.
    pub fn repaint(&mut self) -> Result<(), ScreenError> {
        let Self {
            terminal,
            tree,
            panels,
            editor,
            entry,
            options,
            status,
            clock,
            busy,
        } = self;

        terminal
            .draw(|frame| {
                let [chat, status_row, entry_area] = regions(frame.area(), options.entry_height);

                let report = tree.render(frame.buffer_mut());
                if report.failed > 0 {
                    debug!("Repaint: {} pane(s) painted, {} skipped", report.painted, report.failed);
                }
                for panel in panels.paint_order() {
                    if let Err(e) = panel.render(panel.area(chat), frame.buffer_mut()) {
                        warn!("Panel '{}' skipped this pass: {}", panel.title(), e);
                    }
                }

                let mut bar = StatusBar {
                    mode: editor.mode(),
                    message: status.clone(),
                    active: tree.active_leaf(),
                    clock: clock.clone(),
                    busy: *busy,
                    busy_fill: options.busy_fill,
                    idle_fill: options.idle_fill,
                };
                bar.render(frame, status_row);

                let (text, cursor) = editor.display();
                entry.text = text;
                entry.cursor = cursor;
                entry.render(frame, entry_area);
            })
            .map_err(|e| ScreenError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Apply a structural command to the tree or the panel stack.
    ///
    /// Failures end up in the status message; only `Quit` changes the flow.
    pub fn execute(&mut self, command: EditorCommand) -> Flow {
        debug!("Executing :{}", command);
        let active = self.tree.active_leaf();
        match command {
            EditorCommand::Split(orientation) => {
                let content = TextContainer::shared(self.options.history_length);
                match self.tree.split(orientation, content) {
                    Ok(leaf) => self.set_status(format!("Opened pane {leaf}")),
                    Err(e) => self.set_status(format!("Cannot split: {e}")),
                }
            }
            EditorCommand::Navigate(direction) => {
                if !self.tree.navigate(direction) {
                    self.set_status(format!("No pane to move to with :{}", EditorCommand::Navigate(direction)));
                }
            }
            EditorCommand::ScrollUp => self.tree.scroll_up(active),
            EditorCommand::ScrollDown => self.tree.scroll_down(active),
            EditorCommand::ScrollLock => self.tree.scroll_lock(active),
            EditorCommand::PaneCount => {
                let count = self.tree.leaf_count();
                self.set_status(format!("{count} pane{}", if count == 1 { "" } else { "s" }));
            }
            EditorCommand::ActivePane => self.set_status(format!("Active pane {active}")),
            EditorCommand::Help => self.panels.addwin(Panel::help()),
            EditorCommand::Float => {
                let cascade = self.panels.len() as u16 * 2;
                let panel = Panel::mirror(format!("pane {active}"), self.tree.active_content(), cascade);
                self.panels.addwin(panel);
            }
            EditorCommand::ClosePanel => {
                if self.panels.removewin().is_none() {
                    self.set_status("No panel to close");
                }
            }
            EditorCommand::PanelUp => self.panels.up(),
            EditorCommand::PanelDown => self.panels.down(),
            EditorCommand::Resize(size) => {
                if let Err(e) = self.tree.set_static(active, size) {
                    self.set_status(format!("Cannot resize: {e}"));
                }
            }
            EditorCommand::Quit => return Flow::Quit,
            EditorCommand::Unknown(text) => self.set_status(format!("Unknown command: {text}")),
        }
        Flow::Continue
    }
}

/// The render lock: the one mutex around the whole terminal surface.
pub struct RenderLock<B: Backend> {
    screen: Arc<Mutex<Screen<B>>>,
}

impl<B: Backend> Clone for RenderLock<B> {
    fn clone(&self) -> Self {
        Self {
            screen: self.screen.clone(),
        }
    }
}

impl<B: Backend> RenderLock<B> {
    pub fn new(screen: Screen<B>) -> Self {
        Self {
            screen: Arc::new(Mutex::new(screen)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Screen<B>> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// How many handles to the surface exist, this one included.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.screen)
    }

    /// Give the screen back once every other handle is gone.
    pub fn into_inner(self) -> Result<Screen<B>, Self> {
        match Arc::try_unwrap(self.screen) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(screen) => Err(Self { screen }),
        }
    }
}

impl<B: Backend + Send + 'static> Repaint for RenderLock<B> {
    fn repaint(&self) {
        if let Err(e) = self.lock().repaint() {
            warn!("Repaint failed: {}", e);
        }
    }

    fn set_busy(&self, busy: bool) -> bool {
        self.lock().set_busy(busy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_rows, test_screen};
    use crate::tui::layout::{Direction, Orientation};

    #[test]
    fn test_initial_layout_reserves_status_and_entry() {
        let (screen, _) = test_screen(40, 12);
        assert_eq!(screen.tree().area(screen.tree().root()), Rect::new(0, 0, 40, 8));
    }

    #[test]
    fn test_repaint_draws_content_status_and_entry() {
        let (mut screen, console) = test_screen(30, 8);
        console.append("hello".into());
        screen.set_clock("09:30");
        screen.repaint().unwrap();

        let rows = buffer_rows(screen.terminal().backend().buffer());
        assert_eq!(rows[0], format!("{:<30}", "hello"));
        assert_eq!(rows[4], "---- INSERT | #0 | 09:30 -----");
        assert_eq!(rows[5], "─".repeat(30));
    }

    #[test]
    fn test_split_command_opens_pane_and_reports_it() {
        let (mut screen, _) = test_screen(40, 24);
        assert_eq!(screen.execute(EditorCommand::Split(Orientation::Vertical)), Flow::Continue);
        assert_eq!(screen.tree().leaf_count(), 2);
        assert_eq!(screen.status(), "Opened pane #2");

        screen.execute(EditorCommand::PaneCount);
        assert_eq!(screen.status(), "2 panes");
        screen.execute(EditorCommand::ActivePane);
        assert_eq!(screen.status(), "Active pane #2");
    }

    #[test]
    fn test_failed_structural_commands_become_status() {
        let (mut screen, _) = test_screen(40, 6);
        screen.execute(EditorCommand::Split(Orientation::Horizontal));
        screen.execute(EditorCommand::Split(Orientation::Horizontal));
        assert!(screen.status().starts_with("Cannot split: "), "{}", screen.status());

        screen.execute(EditorCommand::Navigate(Direction::Left));
        assert_eq!(screen.status(), "No pane to move to with :wlf");

        screen.execute(EditorCommand::ClosePanel);
        assert_eq!(screen.status(), "No panel to close");

        screen.execute(EditorCommand::Unknown("frob".into()));
        assert_eq!(screen.status(), "Unknown command: frob");
    }

    #[test]
    fn test_panels_stack_and_close() {
        let (mut screen, _) = test_screen(40, 24);
        screen.execute(EditorCommand::Help);
        screen.execute(EditorCommand::Float);
        assert_eq!(screen.panels().len(), 2);
        assert_eq!(screen.panels().top().map(Panel::title), Some("pane #0"));

        screen.execute(EditorCommand::PanelUp);
        assert_eq!(screen.panels().top().map(Panel::title), Some("help"));
        screen.execute(EditorCommand::ClosePanel);
        assert_eq!(screen.panels().len(), 1);
    }

    #[test]
    fn test_float_mirrors_active_content() {
        let (mut screen, console) = test_screen(40, 24);
        screen.execute(EditorCommand::Float);
        console.append("mirrored".into());
        screen.repaint().unwrap();

        let text: String = buffer_rows(screen.terminal().backend().buffer()).concat();
        assert!(text.contains("pane #0"));
        assert_eq!(text.matches("mirrored").count(), 2);
    }

    #[test]
    fn test_resize_reflows_tree() {
        let (mut screen, _) = test_screen(40, 24);
        screen.execute(EditorCommand::Split(Orientation::Horizontal));
        screen.terminal_mut().backend_mut().resize(60, 44);
        screen.handle_resize(60, 44).unwrap();

        let root = screen.tree().root();
        assert_eq!(screen.tree().area(root), Rect::new(0, 0, 60, 40));
        let children = screen.tree().children(root).to_vec();
        assert_eq!(screen.tree().area(children[0]).height, 20);
        assert_eq!(screen.tree().area(children[1]).height, 20);
        assert_eq!(screen.terminal().backend().buffer().area, Rect::new(0, 0, 60, 44));
    }

    #[test]
    fn test_resize_command_pins_active_pane() {
        let (mut screen, _) = test_screen(40, 24);
        screen.execute(EditorCommand::Split(Orientation::Horizontal));
        screen.execute(EditorCommand::Resize(Some(5)));
        let active = screen.tree().active_leaf();
        assert_eq!(screen.tree().area(active).height, 5);

        screen.execute(EditorCommand::Resize(None));
        assert_eq!(screen.tree().area(active).height, 10);
    }

    #[test]
    fn test_take_changed_clears() {
        let (screen, console) = test_screen(40, 24);
        console.append("x".into());
        assert!(screen.take_changed());
        assert!(!screen.take_changed());
    }

    #[test]
    fn test_busy_and_clock_report_changes() {
        let (mut screen, _) = test_screen(40, 24);
        assert!(screen.set_busy(true));
        assert!(!screen.set_busy(true));
        assert!(screen.set_clock("10:00"));
        assert!(!screen.set_clock("10:00"));
    }

    #[test]
    fn test_render_lock_counts_holders() {
        let (screen, _) = test_screen(20, 8);
        let lock = RenderLock::new(screen);
        let other = lock.clone();
        assert_eq!(lock.holders(), 2);
        drop(other);
        assert_eq!(lock.holders(), 1);
        assert!(lock.into_inner().is_ok());
    }

    #[test]
    fn test_render_lock_repaint_flushes() {
        let (screen, console) = test_screen(20, 8);
        let lock = RenderLock::new(screen);
        console.append("via lock".into());
        assert!(Repaint::set_busy(&lock, true));
        Repaint::repaint(&lock);

        let screen = lock.lock();
        let rows = buffer_rows(screen.terminal().backend().buffer());
        assert!(rows[0].starts_with("via lock"));
        assert!(rows[4].starts_with('*'));
    }
}
