//! Turning content into rows and rows into glyphs.
//!
//! [`visible_lines`] wraps a content snapshot to a width and keeps the rows
//! that fit; [`paint_block`] writes those rows at a rectangle, clearing
//! whatever was there before.

use std::fmt;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::tui::layout::pane::ScrollOffset;
use crate::tui::text_wrap::wrap_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The target rectangle is not fully inside the buffer, typically
    /// because the terminal shrank and the layout hasn't caught up yet.
    OutOfBounds { area: Rect, buffer: Rect },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::OutOfBounds { area, buffer } => {
                write!(f, "area {area} lies outside buffer {buffer}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// The rows a `width` x `height` viewport shows for `history`.
///
/// With [`ScrollOffset::Back`]`(n)` the newest `n` messages are hidden; at
/// least one message always stays visible.
pub fn visible_lines(
    history: &[String],
    scroll: ScrollOffset,
    width: u16,
    height: u16,
    indent: &str,
) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let shown = match scroll {
        ScrollOffset::Auto => history,
        ScrollOffset::Back(n) => {
            let keep = history.len().saturating_sub(n).max(1).min(history.len());
            &history[..keep]
        }
    };

    let mut rows: Vec<String> = Vec::new();
    // Only the tail matters; walk messages newest first and stop once full.
    for message in shown.iter().rev() {
        let mut wrapped = wrap_message(message, width, indent);
        wrapped.append(&mut rows);
        rows = wrapped;
        if rows.len() >= height as usize {
            break;
        }
    }
    let skip = rows.len().saturating_sub(height as usize);
    rows.split_off(skip)
}

/// Write `rows` top-down into `area`, blanking every cell of the area first.
pub fn paint_block(
    buf: &mut Buffer,
    area: Rect,
    rows: &[String],
    style: Style,
) -> Result<(), RenderError> {
    if area.is_empty() {
        return Ok(());
    }
    if buf.area.intersection(area) != area {
        return Err(RenderError::OutOfBounds {
            area,
            buffer: buf.area,
        });
    }

    let blank = " ".repeat(area.width as usize);
    for y in area.top()..area.bottom() {
        buf.set_stringn(area.x, y, &blank, area.width as usize, style);
    }
    for (row, line) in rows.iter().take(area.height as usize).enumerate() {
        buf.set_stringn(area.x, area.y + row as u16, line, area.width as usize, style);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_rows;

    fn history(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_auto_scroll_shows_newest() {
        let h = history(&["a", "b", "c", "d"]);
        assert_eq!(visible_lines(&h, ScrollOffset::Auto, 10, 2, "  "), vec!["c", "d"]);
    }

    #[test]
    fn test_back_hides_newest() {
        let h = history(&["a", "b", "c", "d"]);
        assert_eq!(visible_lines(&h, ScrollOffset::Back(1), 10, 2, "  "), vec!["b", "c"]);
        assert_eq!(visible_lines(&h, ScrollOffset::Back(10), 10, 2, "  "), vec!["a"]);
    }

    #[test]
    fn test_wrapped_rows_count_against_height() {
        let h = history(&["first", "one two three"]);
        assert_eq!(
            visible_lines(&h, ScrollOffset::Auto, 8, 2, "  "),
            vec!["one two", "  three"]
        );
    }

    #[test]
    fn test_zero_sized_viewport() {
        let h = history(&["a"]);
        assert!(visible_lines(&h, ScrollOffset::Auto, 0, 5, "").is_empty());
        assert!(visible_lines(&h, ScrollOffset::Auto, 5, 0, "").is_empty());
        assert!(visible_lines(&[], ScrollOffset::Back(3), 5, 5, "").is_empty());
    }

    #[test]
    fn test_paint_block_clears_stale_cells() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        buf.set_string(0, 0, "xxxxx", Style::default());
        buf.set_string(0, 1, "yyyyy", Style::default());

        paint_block(&mut buf, Rect::new(1, 0, 3, 2), &history(&["ab"]), Style::default()).unwrap();
        assert_eq!(buffer_rows(&buf), vec!["xab x", "y   y"]);
    }

    #[test]
    fn test_paint_block_rejects_out_of_bounds() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        let err = paint_block(&mut buf, Rect::new(3, 0, 4, 2), &[], Style::default()).unwrap_err();
        assert!(matches!(err, RenderError::OutOfBounds { .. }));
    }
}
