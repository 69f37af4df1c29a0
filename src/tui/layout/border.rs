//! # Border Decorator
//!
//! Reserves zero to four edge rows/columns of a rectangle for border glyphs.
//!
//! Each requested edge contributes two independent things:
//!
//! - a glyph spec: which of the eight border positions it paints, merged on
//!   top of an all-blank default
//! - an offset function that moves one side of the inner rectangle inwards
//!
//! Because both compose per edge, any combination of edges works. The
//! border is painted into the outer rectangle before anything is rendered
//! into [`Border::inset`], so wrapped content can never overwrite it.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// The eight border-drawing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub left: &'static str,
    pub right: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
}

impl BorderGlyphs {
    pub const BLANK: BorderGlyphs = BorderGlyphs {
        left: " ",
        right: " ",
        top: " ",
        bottom: " ",
        top_left: " ",
        top_right: " ",
        bottom_left: " ",
        bottom_right: " ",
    };

    /// Merge one edge's spec onto `self`.
    ///
    /// An edge paints its side and extends its line into both of its
    /// corners; a corner shared by two drawn edges becomes a real corner.
    fn with_edge(mut self, edge: Edge, drawn: &[Edge]) -> Self {
        let has = |e: Edge| drawn.contains(&e);
        match edge {
            Edge::Top => {
                self.top = line::HORIZONTAL;
                self.top_left = if has(Edge::Left) { line::TOP_LEFT } else { line::HORIZONTAL };
                self.top_right = if has(Edge::Right) { line::TOP_RIGHT } else { line::HORIZONTAL };
            }
            Edge::Bottom => {
                self.bottom = line::HORIZONTAL;
                self.bottom_left = if has(Edge::Left) { line::BOTTOM_LEFT } else { line::HORIZONTAL };
                self.bottom_right = if has(Edge::Right) { line::BOTTOM_RIGHT } else { line::HORIZONTAL };
            }
            Edge::Left => {
                self.left = line::VERTICAL;
                self.top_left = if has(Edge::Top) { line::TOP_LEFT } else { line::VERTICAL };
                self.bottom_left = if has(Edge::Bottom) { line::BOTTOM_LEFT } else { line::VERTICAL };
            }
            Edge::Right => {
                self.right = line::VERTICAL;
                self.top_right = if has(Edge::Top) { line::TOP_RIGHT } else { line::VERTICAL };
                self.bottom_right = if has(Edge::Bottom) { line::BOTTOM_RIGHT } else { line::VERTICAL };
            }
        }
        self
    }
}

/// Inner bounds as (min_row, min_col, max_row, max_col), max exclusive.
type Bounds = (u16, u16, u16, u16);

fn offset(edge: Edge, (min_row, min_col, max_row, max_col): Bounds) -> Bounds {
    match edge {
        Edge::Top => (min_row.saturating_add(1), min_col, max_row, max_col),
        Edge::Bottom => (min_row, min_col, max_row.saturating_sub(1), max_col),
        Edge::Left => (min_row, min_col.saturating_add(1), max_row, max_col),
        Edge::Right => (min_row, min_col, max_row, max_col.saturating_sub(1)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    edges: Vec<Edge>,
    glyphs: BorderGlyphs,
    style: Style,
    title: Option<String>,
}

impl Border {
    pub fn new(edges: &[Edge]) -> Self {
        let mut unique: Vec<Edge> = Vec::with_capacity(4);
        for edge in edges {
            if !unique.contains(edge) {
                unique.push(*edge);
            }
        }
        let glyphs = unique
            .iter()
            .fold(BorderGlyphs::BLANK, |glyphs, edge| glyphs.with_edge(*edge, &unique));
        Self {
            edges: unique,
            glyphs,
            style: Style::default(),
            title: None,
        }
    }

    pub fn all() -> Self {
        Self::new(&Edge::ALL)
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Title painted over the top edge, if there is one.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn glyphs(&self) -> &BorderGlyphs {
        &self.glyphs
    }

    pub fn has(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    /// The content rectangle left over inside `outer`.
    pub fn inset(&self, outer: Rect) -> Rect {
        let bounds = (outer.y, outer.x, outer.bottom(), outer.right());
        let (min_row, min_col, max_row, max_col) =
            self.edges.iter().fold(bounds, |bounds, edge| offset(*edge, bounds));
        Rect {
            x: min_col,
            y: min_row,
            width: max_col.saturating_sub(min_col),
            height: max_row.saturating_sub(min_row),
        }
    }

    /// Paint the border into `outer`. Cells outside the buffer are skipped.
    pub fn render(&self, outer: Rect, buf: &mut Buffer) {
        if self.edges.is_empty() || outer.is_empty() {
            return;
        }
        let (left, right) = (outer.left(), outer.right() - 1);
        let (top, bottom) = (outer.top(), outer.bottom() - 1);
        let g = &self.glyphs;

        if self.has(Edge::Top) {
            for x in left..=right {
                self.put(buf, x, top, g.top);
            }
        }
        if self.has(Edge::Bottom) {
            for x in left..=right {
                self.put(buf, x, bottom, g.bottom);
            }
        }
        if self.has(Edge::Left) {
            for y in top..=bottom {
                self.put(buf, left, y, g.left);
            }
        }
        if self.has(Edge::Right) {
            for y in top..=bottom {
                self.put(buf, right, y, g.right);
            }
        }

        let corners = [
            (Edge::Top, Edge::Left, left, top, g.top_left),
            (Edge::Top, Edge::Right, right, top, g.top_right),
            (Edge::Bottom, Edge::Left, left, bottom, g.bottom_left),
            (Edge::Bottom, Edge::Right, right, bottom, g.bottom_right),
        ];
        for (a, b, x, y, glyph) in corners {
            if self.has(a) || self.has(b) {
                self.put(buf, x, y, glyph);
            }
        }

        if let (Some(title), true) = (&self.title, self.has(Edge::Top)) {
            let start = left.saturating_add(1);
            let room = right.saturating_sub(start) as usize;
            if room > 0 && buf.area.contains((start, top).into()) {
                buf.set_stringn(start, top, format!(" {title} "), room, self.style);
            }
        }
    }

    fn put(&self, buf: &mut Buffer, x: u16, y: u16, glyph: &str) {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(glyph).set_style(self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_rows;

    #[test]
    fn test_no_edges_inset_is_identity() {
        let area = Rect::new(2, 3, 10, 5);
        assert_eq!(Border::new(&[]).inset(area), area);
    }

    #[test]
    fn test_each_edge_takes_one_cell() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(Border::new(&[Edge::Top]).inset(area), Rect::new(0, 1, 10, 4));
        assert_eq!(Border::new(&[Edge::Bottom]).inset(area), Rect::new(0, 0, 10, 4));
        assert_eq!(Border::new(&[Edge::Left]).inset(area), Rect::new(1, 0, 9, 5));
        assert_eq!(Border::new(&[Edge::Right]).inset(area), Rect::new(0, 0, 9, 5));
        assert_eq!(Border::all().inset(area), Rect::new(1, 1, 8, 3));
    }

    #[test]
    fn test_duplicate_edges_count_once() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(
            Border::new(&[Edge::Left, Edge::Left]).inset(area),
            Rect::new(1, 0, 9, 5)
        );
    }

    #[test]
    fn test_inset_of_tiny_rect_is_empty_not_negative() {
        let inner = Border::all().inset(Rect::new(0, 0, 1, 1));
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn test_glyph_merge_left_bottom() {
        let glyphs = *Border::new(&[Edge::Left, Edge::Bottom]).glyphs();
        assert_eq!(glyphs.left, line::VERTICAL);
        assert_eq!(glyphs.bottom, line::HORIZONTAL);
        assert_eq!(glyphs.bottom_left, line::BOTTOM_LEFT);
        assert_eq!(glyphs.top_left, line::VERTICAL);
        assert_eq!(glyphs.bottom_right, line::HORIZONTAL);
        assert_eq!(glyphs.right, " ");
        assert_eq!(glyphs.top, " ");
        assert_eq!(glyphs.top_right, " ");
    }

    #[test]
    fn test_render_full_box() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 3));
        Border::all().render(buf.area, &mut buf);
        assert_eq!(buffer_rows(&buf), vec!["┌──┐", "│  │", "└──┘"]);
    }

    #[test]
    fn test_render_right_divider() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 2));
        Border::new(&[Edge::Right]).render(buf.area, &mut buf);
        assert_eq!(buffer_rows(&buf), vec!["  │", "  │"]);
    }

    #[test]
    fn test_render_title() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        Border::all().title("hi").render(buf.area, &mut buf);
        assert_eq!(buffer_rows(&buf)[0], "┌ hi ────┐");
    }

    #[test]
    fn test_render_clips_to_buffer() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 3));
        Border::all().render(Rect::new(1, 1, 5, 5), &mut buf);
        assert_eq!(buffer_rows(&buf), vec!["   ", " ┌─", " │ "]);
    }
}
