//! # Content Sources
//!
//! A pane never owns its text directly. It holds a handle to a
//! `ContentSource`: an append-only, capacity-bounded log of display lines
//! with a "changed since you last asked" flag.
//!
//! ```text
//! append("a") ─┐
//! append("b") ─┼─►  [.., "a", "b"]   dirty = true
//!              │
//! changed()  ──┴─►  true   (dirty cleared)
//! changed()  ─────► false
//! ```
//!
//! Sources are shared between the foreground editor, the dispatcher and
//! scheduled events, so every method takes `&self` and synchronizes
//! internally. The inner lock is always taken *after* the render lock,
//! never before it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// History length used when the config doesn't say otherwise.
pub const DEFAULT_HISTORY_LENGTH: usize = 1000;

/// Something a leaf pane can render.
pub trait ContentSource: Send + Sync {
    /// Append one line at the newest end.
    fn append(&self, line: String);

    /// All retained lines, oldest first.
    fn snapshot(&self) -> Vec<String>;

    /// Whether anything was appended since the previous call.
    ///
    /// Read-and-clear: the first call after an append returns `true`, every
    /// following call returns `false` until the next append.
    fn changed(&self) -> bool;
}

/// Shared handle to a content source.
pub type SharedContent = Arc<dyn ContentSource>;

#[derive(Debug, Default)]
struct History {
    lines: VecDeque<String>,
    dirty: bool,
}

/// FIFO line log that evicts the oldest line once `histlen` is exceeded.
#[derive(Debug)]
pub struct TextContainer {
    histlen: usize,
    history: Mutex<History>,
}

impl TextContainer {
    /// A `histlen` of zero is treated as one.
    pub fn new(histlen: usize) -> Self {
        Self {
            histlen: histlen.max(1),
            history: Mutex::new(History::default()),
        }
    }

    /// Convenience constructor returning the shared handle panes expect.
    pub fn shared(histlen: usize) -> SharedContent {
        Arc::new(Self::new(histlen))
    }

    pub fn histlen(&self) -> usize {
        self.histlen
    }

    pub fn len(&self) -> usize {
        self.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TextContainer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LENGTH)
    }
}

impl ContentSource for TextContainer {
    fn append(&self, line: String) {
        let mut history = self.lock();
        history.lines.push_back(line);
        while history.lines.len() > self.histlen {
            history.lines.pop_front();
        }
        history.dirty = true;
    }

    fn snapshot(&self) -> Vec<String> {
        self.lock().lines.iter().cloned().collect()
    }

    fn changed(&self) -> bool {
        std::mem::take(&mut self.lock().dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_last_histlen_lines_in_order() {
        let container = TextContainer::new(3);
        for i in 0..5 {
            container.append(i.to_string());
        }
        assert_eq!(container.snapshot(), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_snapshot_under_capacity_keeps_everything() {
        let container = TextContainer::new(10);
        container.append("a".into());
        container.append("b".into());
        assert_eq!(container.snapshot(), vec!["a", "b"]);
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_last_min_n_k_lines_for_many_sizes() {
        for capacity in 1..6 {
            for appended in 0..12usize {
                let container = TextContainer::new(capacity);
                for i in 0..appended {
                    container.append(format!("line {i}"));
                }
                let expected: Vec<String> = (appended.saturating_sub(capacity)..appended)
                    .map(|i| format!("line {i}"))
                    .collect();
                assert_eq!(container.snapshot(), expected, "capacity={capacity} appended={appended}");
            }
        }
    }

    #[test]
    fn test_changed_is_read_and_clear() {
        let container = TextContainer::new(3);
        assert!(!container.changed());

        container.append("one".into());
        container.append("two".into());
        assert!(container.changed());
        assert!(!container.changed());
        assert!(!container.changed());

        container.append("three".into());
        assert!(container.changed());
        assert!(!container.changed());
    }

    #[test]
    fn test_zero_histlen_keeps_one_line() {
        let container = TextContainer::new(0);
        container.append("a".into());
        container.append("b".into());
        assert_eq!(container.histlen(), 1);
        assert_eq!(container.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_shared_handle_appends_across_threads() {
        let shared = TextContainer::shared(100);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let content = shared.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        content.append(format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.snapshot().len(), 40);
        assert!(shared.changed());
    }
}
