use std::time::Duration;

/// Configuration for a single property transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

/// Easing function for transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// `1 - 2^(-10t)`, snapped to exactly 1 at the end.
    EaseOutExpo,
}

impl Easing {
    /// Apply easing to progress (0.0 to 1.0).
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Property transitions configured on an element, the equivalent of a CSS
/// `transition` declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transitions {
    pub height: Option<TransitionConfig>,
    pub opacity: Option<TransitionConfig>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(mut self, duration: Duration, easing: Easing) -> Self {
        self.height = Some(TransitionConfig::new(duration, easing));
        self
    }

    pub fn opacity(mut self, duration: Duration, easing: Easing) -> Self {
        self.opacity = Some(TransitionConfig::new(duration, easing));
        self
    }

    /// Returns true if any transition is configured.
    pub fn has_any(&self) -> bool {
        self.height.is_some() || self.opacity.is_some()
    }
}
