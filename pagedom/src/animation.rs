use std::collections::HashMap;
use std::time::Duration;

use crate::element::{Document, NodeId};
use crate::transitions::{Easing, TransitionConfig};
use crate::types::Height;

/// Which property is being transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionProperty {
    Height,
    Opacity,
}

impl TransitionProperty {
    /// CSS property name, as reported by `transitionend`.
    pub fn name(self) -> &'static str {
        match self {
            TransitionProperty::Height => "height",
            TransitionProperty::Opacity => "opacity",
        }
    }
}

/// A transition that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEnded {
    pub target: NodeId,
    pub property: TransitionProperty,
}

/// Snapshot of an element's transitionable properties at the last flush.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ElementSnapshot {
    height: Height,
    opacity: f32,
}

/// A single active transition.
#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl ActiveTransition {
    fn value_at(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        let eased = self.easing.apply(progress);
        self.from + (self.to - self.from) * eased
    }

    fn is_complete(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

/// Differences smaller than this are treated as no change.
const EPSILON: f32 = 0.01;

/// Tracks inline style changes between flushes and runs the resulting
/// transitions, the way a browser's style engine does.
///
/// A transition starts when a flush sees a px-to-px change on a property
/// that has a non-zero transition configured. `auto` heights never animate:
/// changing to or from `auto` jumps and cancels any running height
/// transition. Replaced or cancelled transitions never report completion.
#[derive(Debug, Default)]
pub struct AnimationState {
    /// Property values per element as of the previous flush.
    snapshots: HashMap<NodeId, ElementSnapshot>,
    /// Currently active transitions: (element, property) -> transition.
    active: HashMap<(NodeId, TransitionProperty), ActiveTransition>,
    /// Reduced motion flag - when true, no transition ever starts.
    reduced_motion: bool,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reduced motion (accessibility).
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Returns true if any transition is currently active.
    pub fn has_active_transitions(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_animating(&self, id: NodeId, property: TransitionProperty) -> bool {
        self.active.contains_key(&(id, property))
    }

    /// Record the document's current inline styles, starting, retargeting or
    /// cancelling transitions for anything that changed since the last flush.
    pub fn flush(&mut self, doc: &Document, now: Duration) {
        for id in doc.ids() {
            let Some(node) = doc.node(id) else { continue };
            let current = ElementSnapshot {
                height: node.style.height,
                opacity: node.style.opacity,
            };

            if let Some(prev) = self.snapshots.get(&id).copied() {
                if prev.height != current.height {
                    self.height_changed(id, prev.height, current.height, node.transitions.height, now);
                }
                if (prev.opacity - current.opacity).abs() > f32::EPSILON {
                    self.value_changed(
                        id,
                        TransitionProperty::Opacity,
                        prev.opacity,
                        current.opacity,
                        node.transitions.opacity,
                        now,
                    );
                }
            }

            self.snapshots.insert(id, current);
        }

        if self.snapshots.len() > doc.len() {
            self.cleanup(doc);
        }
    }

    /// Forget snapshots and transitions of nodes the document has freed.
    pub fn cleanup(&mut self, doc: &Document) {
        self.snapshots.retain(|&id, _| doc.node(id).is_some());
        self.active.retain(|&(id, _), _| doc.node(id).is_some());
    }

    /// Number of nodes with a recorded style snapshot.
    pub fn tracked(&self) -> usize {
        self.snapshots.len()
    }

    fn height_changed(
        &mut self,
        id: NodeId,
        prev: Height,
        current: Height,
        config: Option<TransitionConfig>,
        now: Duration,
    ) {
        match (prev, current) {
            (Height::Px(from), Height::Px(to)) => {
                self.value_changed(id, TransitionProperty::Height, from, to, config, now)
            }
            _ => {
                if self.active.remove(&(id, TransitionProperty::Height)).is_some() {
                    log::trace!("[animation] {id} height -> {current}, transition cancelled");
                }
            }
        }
    }

    fn value_changed(
        &mut self,
        id: NodeId,
        property: TransitionProperty,
        prev: f32,
        current: f32,
        config: Option<TransitionConfig>,
        now: Duration,
    ) {
        let key = (id, property);

        let config = match config {
            Some(config) if !config.duration.is_zero() && !self.reduced_motion => config,
            _ => {
                self.active.remove(&key);
                return;
            }
        };

        // Retarget from the current interpolated value
        let from = match self.active.get(&key) {
            Some(existing) => existing.value_at(now),
            None => prev,
        };

        if (from - current).abs() < EPSILON {
            self.active.remove(&key);
            return;
        }

        log::trace!(
            "[animation] {id} {} {from} -> {current} over {:?}",
            property.name(),
            config.duration
        );
        self.active.insert(
            key,
            ActiveTransition {
                from,
                to: current,
                start: now,
                duration: config.duration,
                easing: config.easing,
            },
        );
    }

    /// Drop completed transitions and report them, ordered by element then property.
    pub fn advance(&mut self, now: Duration) -> Vec<TransitionEnded> {
        let mut ended: Vec<TransitionEnded> = self
            .active
            .iter()
            .filter(|(_, t)| t.is_complete(now))
            .map(|(&(target, property), _)| TransitionEnded { target, property })
            .collect();
        ended.sort_by_key(|e| (e.target, e.property));

        for e in &ended {
            self.active.remove(&(e.target, e.property));
        }
        ended
    }

    /// Get the interpolated value for a property.
    /// Returns None if no transition is active for it.
    pub fn get_interpolated(
        &self,
        id: NodeId,
        property: TransitionProperty,
        now: Duration,
    ) -> Option<f32> {
        self.active.get(&(id, property)).map(|t| t.value_at(now))
    }

    /// Earliest time at which an active transition completes.
    pub fn next_completion(&self) -> Option<Duration> {
        self.active.values().map(|t| t.start + t.duration).min()
    }
}
