use crate::animation::TransitionProperty;
use crate::element::NodeId;

/// Events delivered to listeners.
///
/// Element events carry a target and bubble from it up to the root. Window
/// events have no target and are delivered to listeners on the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Primary-button click on an element
    Click { target: NodeId, modifiers: Modifiers },
    /// A CSS transition ran to completion
    TransitionEnd {
        target: NodeId,
        property: TransitionProperty,
    },
    /// The window scrolled
    Scroll { scroll_y: f32 },
    /// The window was resized
    Resize { width: f32, height: f32 },
    /// The page and its resources finished loading
    Load,
    /// The page was shown, `persisted` when restored from the back/forward cache
    PageShow { persisted: bool },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::TransitionEnd { .. } => EventKind::TransitionEnd,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Resize { .. } => EventKind::Resize,
            Event::Load => EventKind::Load,
            Event::PageShow { .. } => EventKind::PageShow,
        }
    }

    /// The element the event was dispatched at, None for window events.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Event::Click { target, .. } | Event::TransitionEnd { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// Event type used to register listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    TransitionEnd,
    Scroll,
    Resize,
    Load,
    PageShow,
}

/// Key modifiers held during a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Default::default()
        }
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.meta
    }
}
