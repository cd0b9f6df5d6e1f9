/// Inline `height` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Height {
    /// Size to content. Not animatable.
    #[default]
    Auto,
    /// Fixed pixel height.
    Px(f32),
}

impl Height {
    pub fn px(self) -> Option<f32> {
        match self {
            Height::Px(v) => Some(v),
            Height::Auto => None,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Height::Auto)
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Height::Auto => write!(f, "auto"),
            Height::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// How a scroll request reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Auto,
    /// Animate over the page's smooth-scroll duration.
    Smooth,
}

/// Inline `overflow` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}
