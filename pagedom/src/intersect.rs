//! Viewport intersection observation.

use std::collections::HashMap;

use crate::element::NodeId;
use crate::layout::{Layout, Viewport};

/// One side of an observer's root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    Px(f32),
    /// Percentage of the viewport height.
    Percent(f32),
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Px(0.0)
    }
}

impl Margin {
    fn resolve(self, viewport_height: f32) -> f32 {
        match self {
            Margin::Px(v) => v,
            Margin::Percent(p) => viewport_height * p / 100.0,
        }
    }
}

/// Observer configuration. Negative margins shrink the observed band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserverOptions {
    pub margin_top: Margin,
    pub margin_bottom: Margin,
    /// Fraction of the target that must be inside the band (0.0 to 1.0).
    pub threshold: f32,
}

impl ObserverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn margin_top(mut self, margin: Margin) -> Self {
        self.margin_top = margin;
        self
    }

    pub fn margin_bottom(mut self, margin: Margin) -> Self {
        self.margin_bottom = margin;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// A change in a target's intersection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f32,
}

/// Watches a set of targets against a band of the viewport.
///
/// The first check after a target is observed always reports it; later
/// checks only report targets whose intersecting state flipped.
#[derive(Debug, Clone, Default)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: Vec<NodeId>,
    last: HashMap<NodeId, bool>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
            last: HashMap::new(),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn observe(&mut self, target: NodeId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    pub fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|&t| t != target);
        self.last.remove(&target);
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn check(&mut self, layout: &Layout<'_>, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let band_top = -self.options.margin_top.resolve(viewport.height);
        let band_bottom = viewport.height + self.options.margin_bottom.resolve(viewport.height);

        let mut entries = Vec::new();
        for &target in &self.targets {
            let rect = layout.bounding_rect(target, viewport);
            let (is_intersecting, ratio) = match rect.overlap(band_top, band_bottom) {
                None => (false, 0.0),
                Some(_) if rect.height <= 0.0 => (true, 1.0),
                Some(len) => {
                    let ratio = (len / rect.height).min(1.0);
                    let hit = if self.options.threshold > 0.0 {
                        ratio >= self.options.threshold
                    } else {
                        true
                    };
                    (hit, ratio)
                }
            };

            if self.last.get(&target) != Some(&is_intersecting) {
                self.last.insert(target, is_intersecting);
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}
