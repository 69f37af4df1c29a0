//! # Pane Tree
//!
//! Panes live in a flat arena and refer to each other by [`PaneId`]. A
//! parent owns its children's slots; a child's `parent` field is only a
//! back-reference used for focus propagation.
//!
//! A node is exactly one of:
//!
//! - **Leaf**: renders a [`SharedContent`] with a scroll offset
//! - **Split**: two or more children laid out along a fixed [`Orientation`],
//!   plus the index of the active child
//!
//! ## Resize
//!
//! Whenever a split's rectangle changes its children are re-partitioned
//! along the split axis (see [`sizing::partition`]) and placed contiguously
//! from offset 0 in list order; the cross axis is always the full extent.
//! Children that are splits recurse.
//!
//! ## Focus
//!
//! The active leaf is found by following `active` indices from the root.
//! Splitting and navigation only ever move along that chain.

use std::fmt;

use log::{debug, warn};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::border::{Border, Edge};
use super::paint::{paint_block, visible_lines};
use super::sizing::{self, Sizing};
use super::{Direction, LayoutError, Orientation};
use crate::core::content::SharedContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(usize);

impl PaneId {
    pub const ROOT: PaneId = PaneId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which part of a leaf's history is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollOffset {
    /// Always show the newest lines.
    #[default]
    Auto,
    /// Hide the newest `n` messages.
    Back(usize),
}

impl ScrollOffset {
    fn up(self) -> Self {
        match self {
            ScrollOffset::Auto => ScrollOffset::Back(1),
            ScrollOffset::Back(n) => ScrollOffset::Back(n.saturating_add(1)),
        }
    }

    fn down(self) -> Self {
        match self {
            ScrollOffset::Auto | ScrollOffset::Back(0 | 1) => ScrollOffset::Auto,
            ScrollOffset::Back(n) => ScrollOffset::Back(n - 1),
        }
    }
}

enum PaneKind {
    Leaf {
        content: SharedContent,
        scroll: ScrollOffset,
    },
    Split {
        orientation: Orientation,
        children: Vec<PaneId>,
        active: usize,
    },
}

struct PaneNode {
    parent: Option<PaneId>,
    area: Rect,
    sizing: Sizing,
    border: Option<Border>,
    kind: PaneKind,
}

impl PaneNode {
    fn leaf(parent: Option<PaneId>, area: Rect, content: SharedContent) -> Self {
        Self {
            parent,
            area,
            sizing: Sizing::Dynamic,
            border: None,
            kind: PaneKind::Leaf {
                content,
                scroll: ScrollOffset::Auto,
            },
        }
    }

    fn inner(&self) -> Rect {
        match &self.border {
            Some(border) => border.inset(self.area),
            None => self.area,
        }
    }
}

/// Outcome of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub painted: usize,
    pub failed: usize,
}

/// Extent of `area` along the split axis of `orientation`.
fn extent(area: Rect, orientation: Orientation) -> u16 {
    match orientation {
        Orientation::Horizontal => area.height,
        Orientation::Vertical => area.width,
    }
}

pub struct PaneTree {
    nodes: Vec<PaneNode>,
    indent: String,
}

impl PaneTree {
    /// A tree with a single leaf covering `area`.
    pub fn new(area: Rect, content: SharedContent) -> Self {
        Self {
            nodes: vec![PaneNode::leaf(None, area, content)],
            indent: String::new(),
        }
    }

    /// Prefix for wrapped continuation rows.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn root(&self) -> PaneId {
        PaneId::ROOT
    }

    fn node(&self, id: PaneId) -> &PaneNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: PaneId) -> &mut PaneNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn area(&self, id: PaneId) -> Rect {
        self.node(id).area
    }

    /// The rectangle left for content or children once the border is drawn.
    pub fn inner_area(&self, id: PaneId) -> Rect {
        self.node(id).inner()
    }

    pub fn parent(&self, id: PaneId) -> Option<PaneId> {
        self.node(id).parent
    }

    pub fn children(&self, id: PaneId) -> &[PaneId] {
        match &self.node(id).kind {
            PaneKind::Split { children, .. } => children,
            PaneKind::Leaf { .. } => &[],
        }
    }

    pub fn orientation(&self, id: PaneId) -> Option<Orientation> {
        match &self.node(id).kind {
            PaneKind::Split { orientation, .. } => Some(*orientation),
            PaneKind::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self, id: PaneId) -> bool {
        matches!(self.node(id).kind, PaneKind::Leaf { .. })
    }

    pub fn content(&self, id: PaneId) -> Option<&SharedContent> {
        match &self.node(id).kind {
            PaneKind::Leaf { content, .. } => Some(content),
            PaneKind::Split { .. } => None,
        }
    }

    /// Attach a different content source to a leaf.
    pub fn set_content(&mut self, id: PaneId, new_content: SharedContent) -> Result<(), LayoutError> {
        match &mut self.node_mut(id).kind {
            PaneKind::Leaf { content, scroll } => {
                *content = new_content;
                *scroll = ScrollOffset::Auto;
                Ok(())
            }
            PaneKind::Split { .. } => Err(LayoutError::NotALeaf(id)),
        }
    }

    pub fn scroll(&self, id: PaneId) -> Option<ScrollOffset> {
        match &self.node(id).kind {
            PaneKind::Leaf { scroll, .. } => Some(*scroll),
            PaneKind::Split { .. } => None,
        }
    }

    pub fn sizing(&self, id: PaneId) -> Sizing {
        self.node(id).sizing
    }

    pub fn border(&self, id: PaneId) -> Option<&Border> {
        self.node(id).border.as_ref()
    }

    /// Decorate the root. Children's borders are dividers managed by resize.
    pub fn set_root_border(&mut self, border: Option<Border>) {
        self.node_mut(PaneId::ROOT).border = border;
        self.resize(PaneId::ROOT);
    }

    pub fn leaves(&self) -> Vec<PaneId> {
        let mut leaves = Vec::new();
        self.collect_leaves(PaneId::ROOT, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: PaneId, out: &mut Vec<PaneId>) {
        match &self.node(id).kind {
            PaneKind::Leaf { .. } => out.push(id),
            PaneKind::Split { children, .. } => {
                for child in children {
                    self.collect_leaves(*child, out);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Follow the active-child chain from the root to a leaf.
    pub fn active_leaf(&self) -> PaneId {
        let mut id = PaneId::ROOT;
        while let PaneKind::Split {
            children, active, ..
        } = &self.node(id).kind
        {
            id = children[*active];
        }
        id
    }

    pub fn active_content(&self) -> SharedContent {
        let mut id = PaneId::ROOT;
        loop {
            match &self.node(id).kind {
                PaneKind::Leaf { content, .. } => return content.clone(),
                PaneKind::Split {
                    children, active, ..
                } => id = children[*active],
            }
        }
    }

    /// Make `id` the target of the active chain by updating every ancestor.
    pub fn activate(&mut self, id: PaneId) {
        let mut child = id;
        while let Some(parent) = self.node(child).parent {
            if let PaneKind::Split {
                children, active, ..
            } = &mut self.node_mut(parent).kind
            {
                if let Some(index) = children.iter().position(|c| *c == child) {
                    *active = index;
                }
            }
            child = parent;
        }
    }

    /// Split the active leaf and return the new leaf showing `content`.
    ///
    /// The active leaf always becomes a container of `orientation`: its
    /// content moves to a new first child and the new leaf is the second,
    /// both inside the leaf's original rectangle. A container's orientation
    /// never changes, so later splits land in whichever leaf is active below
    /// it. The new leaf becomes active.
    pub fn split(&mut self, orientation: Orientation, content: SharedContent) -> Result<PaneId, LayoutError> {
        let leaf = self.active_leaf();
        self.convert(leaf, orientation, content)
    }

    fn convert(&mut self, leaf: PaneId, orientation: Orientation, content: SharedContent) -> Result<PaneId, LayoutError> {
        let inner = self.inner_area(leaf);
        let required = sizing::required_extent(&[Sizing::Dynamic, Sizing::Dynamic]);
        if extent(inner, orientation) < required {
            return Err(LayoutError::TooSmall {
                pane: leaf,
                extent: extent(inner, orientation),
                required,
            });
        }

        let (old_content, old_scroll) = match &self.node(leaf).kind {
            PaneKind::Leaf { content, scroll } => (content.clone(), *scroll),
            PaneKind::Split { .. } => return Err(LayoutError::NotALeaf(leaf)),
        };

        let first = PaneId(self.nodes.len());
        let second = PaneId(self.nodes.len() + 1);
        let mut moved = PaneNode::leaf(Some(leaf), inner, old_content);
        if let PaneKind::Leaf { scroll, .. } = &mut moved.kind {
            *scroll = old_scroll;
        }
        self.nodes.push(moved);
        self.nodes.push(PaneNode::leaf(Some(leaf), Rect::default(), content));

        self.node_mut(leaf).kind = PaneKind::Split {
            orientation,
            children: vec![first, second],
            active: 1,
        };
        self.activate(second);
        debug!("Pane {} split {} into {} and {}", leaf, orientation, first, second);
        self.resize(leaf);
        Ok(second)
    }

    fn check_room(&self, container: PaneId, orientation: Orientation, sizings: &[Sizing]) -> Result<(), LayoutError> {
        let available = extent(self.inner_area(container), orientation);
        let required = sizing::required_extent(sizings);
        if available < required {
            return Err(LayoutError::TooSmall {
                pane: container,
                extent: available,
                required,
            });
        }
        Ok(())
    }

    /// Pin a pane to `size` cells along its parent's axis (`None` = dynamic).
    pub fn set_static(&mut self, id: PaneId, size: Option<u16>) -> Result<(), LayoutError> {
        let parent = self.parent(id).ok_or(LayoutError::NoParent(id))?;
        let orientation = self.orientation(parent).ok_or(LayoutError::NotALeaf(parent))?;
        let wanted = size.map_or(Sizing::Dynamic, Sizing::Static);
        let sizings: Vec<Sizing> = self
            .children(parent)
            .iter()
            .map(|c| if *c == id { wanted } else { self.sizing(*c) })
            .collect();
        self.check_room(parent, orientation, &sizings)?;

        self.node_mut(id).sizing = wanted;
        self.resize(parent);
        Ok(())
    }

    /// Give the root a new rectangle and lay the whole tree out again.
    pub fn set_area(&mut self, area: Rect) {
        self.node_mut(PaneId::ROOT).area = area;
        self.resize(PaneId::ROOT);
    }

    /// Re-partition `id`'s children inside its current rectangle.
    pub fn resize(&mut self, id: PaneId) {
        let inner = self.inner_area(id);
        let (orientation, children) = match &self.node(id).kind {
            PaneKind::Split {
                orientation,
                children,
                ..
            } => (*orientation, children.clone()),
            PaneKind::Leaf { .. } => return,
        };

        let sizings: Vec<Sizing> = children.iter().map(|c| self.sizing(*c)).collect();
        let total = extent(inner, orientation);
        if total < sizing::required_extent(&sizings) {
            warn!(
                "Pane {} has {} cells for children needing {}; clamping",
                id,
                total,
                sizing::required_extent(&sizings)
            );
        }
        let extents = sizing::partition(total, &sizings);

        let last = children.len().saturating_sub(1);
        let mut offset = 0u16;
        for (index, (child, size)) in children.iter().zip(extents).enumerate() {
            let area = match orientation {
                Orientation::Horizontal => Rect::new(inner.x, inner.y + offset, inner.width, size),
                Orientation::Vertical => Rect::new(inner.x + offset, inner.y, size, inner.height),
            };
            offset += size;

            let divider = (index < last).then(|| match orientation {
                Orientation::Horizontal => Border::new(&[Edge::Bottom]),
                Orientation::Vertical => Border::new(&[Edge::Right]),
            });
            let node = self.node_mut(*child);
            node.area = area;
            node.border = divider;
            self.resize(*child);
        }
    }

    /// Move focus within the nearest container along `direction`'s axis.
    ///
    /// Starting at the root, a container whose orientation doesn't match
    /// forwards the request to its active child. Reaching a leaf means there
    /// is nothing to move within; returns `false`.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let mut id = PaneId::ROOT;
        loop {
            match &mut self.nodes[id.0].kind {
                PaneKind::Leaf { .. } => return false,
                PaneKind::Split {
                    orientation,
                    children,
                    active,
                } => {
                    if *orientation == direction.axis() {
                        let count = children.len() as isize;
                        *active = (*active as isize + direction.step()).rem_euclid(count) as usize;
                        debug!("Pane {} focus -> child {}", id, active);
                        return true;
                    }
                    id = children[*active];
                }
            }
        }
    }

    pub fn scroll_up(&mut self, id: PaneId) {
        if let PaneKind::Leaf { scroll, .. } = &mut self.node_mut(id).kind {
            *scroll = scroll.up();
        }
    }

    pub fn scroll_down(&mut self, id: PaneId) {
        if let PaneKind::Leaf { scroll, .. } = &mut self.node_mut(id).kind {
            *scroll = scroll.down();
        }
    }

    pub fn scroll_lock(&mut self, id: PaneId) {
        if let PaneKind::Leaf { scroll, .. } = &mut self.node_mut(id).kind {
            *scroll = ScrollOffset::Auto;
        }
    }

    /// Ask every leaf's content whether it changed. Clears all dirty flags.
    pub fn take_changed(&self) -> bool {
        self.leaves().into_iter().fold(false, |changed, id| {
            let leaf_changed = self.content(id).is_some_and(|content| content.changed());
            changed | leaf_changed
        })
    }

    /// Paint the whole tree into `buf`, depth first in child order.
    ///
    /// A leaf that can't paint is logged and skipped; its siblings still
    /// render.
    pub fn render(&self, buf: &mut Buffer) -> RenderReport {
        let mut report = RenderReport::default();
        self.render_node(PaneId::ROOT, buf, &mut report);
        report
    }

    fn render_node(&self, id: PaneId, buf: &mut Buffer, report: &mut RenderReport) {
        let node = self.node(id);
        match &node.kind {
            PaneKind::Leaf { content, scroll } => {
                if let Some(border) = &node.border {
                    border.render(node.area, buf);
                }
                let inner = node.inner();
                let rows = visible_lines(&content.snapshot(), *scroll, inner.width, inner.height, &self.indent);
                match paint_block(buf, inner, &rows, Style::default()) {
                    Ok(()) => report.painted += 1,
                    Err(e) => {
                        warn!("Pane {} skipped this pass: {}", id, e);
                        report.failed += 1;
                    }
                }
            }
            PaneKind::Split { children, .. } => {
                for child in children {
                    self.render_node(*child, buf, report);
                }
                if let Some(border) = &node.border {
                    border.render(node.area, buf);
                }
            }
        }
    }
}
