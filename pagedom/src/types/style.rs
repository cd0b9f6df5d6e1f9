use super::{Height, Overflow};

/// Inline style of an element. Only the properties the transition engine and
/// layout care about are modelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub height: Height,
    pub opacity: f32,
    pub overflow: Overflow,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            height: Height::Auto,
            opacity: 1.0,
            overflow: Overflow::Visible,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(mut self, height: Height) -> Self {
        self.height = height;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }
}
