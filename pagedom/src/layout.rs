//! Stacked block layout.
//!
//! Every element is a full-width block: its own intrinsic height comes first,
//! then its children stacked top to bottom. That is enough geometry for
//! measuring panels, scroll offsets and intersection checks.

use std::time::Duration;

use crate::animation::{AnimationState, TransitionProperty};
use crate::element::{Document, NodeId};
use crate::types::Height;

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }
}

/// Vertical extent of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Length of the overlap with `[top, bottom)`, or None when disjoint.
    pub fn overlap(&self, top: f32, bottom: f32) -> Option<f32> {
        let start = self.top.max(top);
        let end = self.bottom().min(bottom);
        (end >= start).then_some(end - start)
    }
}

/// Read-only layout view over a document and its running transitions.
#[derive(Clone, Copy)]
pub struct Layout<'a> {
    doc: &'a Document,
    animation: &'a AnimationState,
    now: Duration,
}

impl<'a> Layout<'a> {
    pub fn new(doc: &'a Document, animation: &'a AnimationState, now: Duration) -> Self {
        Self {
            doc,
            animation,
            now,
        }
    }

    /// Height the element occupies right now.
    pub fn rendered_height(&self, id: NodeId) -> f32 {
        if let Some(h) = self
            .animation
            .get_interpolated(id, TransitionProperty::Height, self.now)
        {
            return h.max(0.0);
        }
        match self.doc.height(id) {
            Height::Px(h) => h.max(0.0),
            Height::Auto => self.natural_height(id),
        }
    }

    /// Height the element would have with `height: auto`.
    pub fn natural_height(&self, id: NodeId) -> f32 {
        let own = self.doc.node(id).map(|n| n.intrinsic_height).unwrap_or(0.0);
        own + self
            .doc
            .children(id)
            .iter()
            .map(|&c| self.rendered_height(c))
            .sum::<f32>()
    }

    /// Offset of the element's top edge from the top of the document.
    pub fn document_top(&self, id: NodeId) -> f32 {
        let Some(parent) = self.doc.parent(id) else {
            return 0.0;
        };
        let header = self.doc.node(parent).map(|n| n.intrinsic_height).unwrap_or(0.0);
        let preceding: f32 = self
            .doc
            .children(parent)
            .iter()
            .take_while(|&&c| c != id)
            .map(|&c| self.rendered_height(c))
            .sum();
        self.document_top(parent) + header + preceding
    }

    pub fn document_height(&self) -> f32 {
        self.rendered_height(self.doc.root())
    }

    /// Element extent relative to the viewport, like `getBoundingClientRect`.
    pub fn bounding_rect(&self, id: NodeId, viewport: &Viewport) -> Rect {
        Rect::new(
            self.document_top(id) - viewport.scroll_y,
            self.rendered_height(id),
        )
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, viewport: &Viewport) -> f32 {
        (self.document_height() - viewport.height).max(0.0)
    }
}
