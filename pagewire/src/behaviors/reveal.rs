use std::any::Any;

use pagedom::{IntersectionEntry, Margin, NodeId, ObserverOptions};

use super::select_all;
use crate::behavior::Behavior;
use crate::runtime::{Context, ObserverId};

const VISIBLE: &str = "is-visible";

/// Adds `is-visible` to `.reveal-on-scroll` elements as they scroll in.
#[derive(Debug, Default)]
pub struct Reveal {
    observer: Option<ObserverId>,
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Reveal {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let items: Vec<NodeId> = select_all(cx, ".reveal-on-scroll");
        if items.is_empty() {
            return;
        }

        let options = ObserverOptions::new()
            .margin_bottom(Margin::Px(-50.0))
            .threshold(0.15);
        let observer = if cx.reduced_motion() {
            None
        } else {
            cx.create_observer(options, 0)
        };

        match observer {
            Some(observer) => {
                for &item in &items {
                    cx.observe(observer, item);
                }
                self.observer = Some(observer);
            }
            None => {
                for &item in &items {
                    cx.document_mut().add_class(item, VISIBLE);
                }
            }
        }
    }

    fn on_intersect(&mut self, _token: u64, entries: &[IntersectionEntry], cx: &mut Context<'_>) {
        let Some(observer) = self.observer else { return };
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            cx.document_mut().add_class(entry.target, VISIBLE);
            cx.unobserve(observer, entry.target);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
