//! Numbers that count up when scrolled into view.
//!
//! `data-target` holds the final value; `data-prefix`, `data-suffix` and
//! `data-decimals` control formatting.

use std::any::Any;
use std::time::Duration;

use pagedom::{Easing, IntersectionEntry, NodeId, ObserverOptions};

use super::select_all;
use crate::behavior::Behavior;
use crate::runtime::{Context, ObserverId};

const VISIBILITY: u64 = u64::MAX;

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub element: NodeId,
    pub target: f64,
    pub prefix: String,
    pub suffix: String,
    pub decimals: usize,
    started: Option<Duration>,
}

impl Counter {
    fn parse(cx: &Context<'_>, element: NodeId) -> Option<Self> {
        let doc = cx.document();
        let target = doc.attr(element, "data-target")?.trim().parse::<f64>().ok()?;
        if !target.is_finite() {
            return None;
        }
        Some(Self {
            element,
            target,
            prefix: doc.attr(element, "data-prefix").unwrap_or_default().to_string(),
            suffix: doc.attr(element, "data-suffix").unwrap_or_default().to_string(),
            decimals: doc
                .attr(element, "data-decimals")
                .and_then(|d| d.trim().parse().ok())
                .unwrap_or(0),
            started: None,
        })
    }

    pub fn format(&self, value: f64) -> String {
        format!("{}{:.*}{}", self.prefix, self.decimals, value, self.suffix)
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    counters: Vec<Counter>,
    observer: Option<ObserverId>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    fn start(&mut self, index: usize, cx: &mut Context<'_>) {
        let counter = &mut self.counters[index];
        if counter.started.is_some() {
            return;
        }
        counter.started = Some(cx.now());
        cx.request_frame(index as u64);
    }
}

impl Behavior for Counters {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        for element in select_all(cx, "[data-target]") {
            match Counter::parse(cx, element) {
                Some(counter) => self.counters.push(counter),
                None => log::debug!("[counter] {element} has no numeric data-target"),
            }
        }
        if self.counters.is_empty() {
            return;
        }

        let Some(observer) =
            cx.create_observer(ObserverOptions::new().threshold(0.5), VISIBILITY)
        else {
            // Without an observer there is nothing to trigger the count
            for counter in &self.counters {
                let text = counter.format(counter.target);
                cx.document_mut().set_text(counter.element, text);
            }
            return;
        };
        for counter in &self.counters {
            cx.observe(observer, counter.element);
        }
        self.observer = Some(observer);
    }

    fn on_intersect(&mut self, _token: u64, entries: &[IntersectionEntry], cx: &mut Context<'_>) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(index) = self.counters.iter().position(|c| c.element == entry.target) else {
                continue;
            };
            if let Some(observer) = self.observer {
                cx.unobserve(observer, entry.target);
            }
            self.start(index, cx);
        }
    }

    fn on_frame(&mut self, token: u64, cx: &mut Context<'_>) {
        let index = token as usize;
        let Some(counter) = self.counters.get(index) else {
            return;
        };
        let Some(started) = counter.started else {
            return;
        };

        let duration = cx.config().counter_duration.as_secs_f64();
        let elapsed = cx.now().saturating_sub(started).as_secs_f64();
        let progress = if duration > 0.0 {
            (elapsed / duration).min(1.0)
        } else {
            1.0
        };

        if progress < 1.0 {
            let ease = Easing::EaseOutExpo.apply(progress as f32) as f64;
            let text = counter.format(ease * counter.target);
            cx.document_mut().set_text(counter.element, text);
            cx.request_frame(token);
        } else {
            let text = counter.format(counter.target);
            cx.document_mut().set_text(counter.element, text);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
