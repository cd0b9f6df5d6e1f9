//! Animated, accessible expand/collapse for FAQ `<details>` widgets.
//!
//! Each `<details>` under the configured root gets its trailing content
//! wrapped in a `div.faq-panel`. Clicking the `<summary>` animates the panel
//! height between `0` and its measured content height; once the transition
//! ends an open panel goes back to `auto` so it can grow with its content.

use std::collections::HashMap;
use std::time::Duration;

use pagedom::{
    Document, Easing, Element, Event, EventKind, FrameId, Height, ListenerId, NodeId, Selector,
    TimerId, TransitionProperty, Transitions,
};

use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

const PANEL_CLASS: &str = "faq-panel";

/// A `<details>` element with its trigger and the panel built from its body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisclosureWidget {
    details: NodeId,
    trigger: NodeId,
    panel: NodeId,
}

impl DisclosureWidget {
    pub fn details(&self) -> NodeId {
        self.details
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// Read from the `open` attribute, which the host may also change.
    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_attr(self.details, "open")
    }
}

/// Direction of an in-flight toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Opening,
    Closing,
}

/// Book-keeping for one animated toggle.
#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    motion: Motion,
    /// Height the panel animates towards.
    target: f32,
    /// Completion listener on the panel.
    listener: ListenerId,
    /// Next-frame write of the target height, until it runs.
    frame: Option<FrameId>,
    timeout: Option<TimerId>,
}

/// Drives every disclosure widget under one root element.
#[derive(Debug, Default)]
pub struct AccordionController {
    widgets: Vec<DisclosureWidget>,
    /// At most one entry per widget, keyed by widget index.
    pending: HashMap<usize, PendingTransition>,
    completions: usize,
}

impl AccordionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widgets(&self) -> &[DisclosureWidget] {
        &self.widgets
    }

    pub fn widget(&self, details: NodeId) -> Option<&DisclosureWidget> {
        self.widgets.iter().find(|w| w.details == details)
    }

    pub fn is_open(&self, doc: &Document, details: NodeId) -> bool {
        self.widget(details).is_some_and(|w| w.is_open(doc))
    }

    pub fn panel(&self, details: NodeId) -> Option<NodeId> {
        self.widget(details).map(|w| w.panel)
    }

    pub fn has_pending(&self, details: NodeId) -> bool {
        self.pending_motion(details).is_some()
    }

    pub fn pending_motion(&self, details: NodeId) -> Option<Motion> {
        let index = self.index_of(details)?;
        self.pending.get(&index).map(|p| p.motion)
    }

    /// Number of toggles that ran to completion through a transition end or
    /// the settle timeout.
    pub fn completions(&self) -> usize {
        self.completions
    }

    fn index_of(&self, details: NodeId) -> Option<usize> {
        self.widgets.iter().position(|w| w.details == details)
    }

    /// Set up every `<details>` in `candidates`. Widgets without a direct
    /// `<summary>` child are skipped.
    pub fn initialize(&mut self, candidates: &[NodeId], cx: &mut Context<'_>) {
        for &details in candidates {
            if self.index_of(details).is_some() {
                continue;
            }
            let Some(trigger) = direct_child(cx, details, |doc, n| doc.tag(n) == Some("summary"))
            else {
                log::debug!("[accordion] {details} has no summary, skipping");
                continue;
            };

            let panel = ensure_panel(cx, details, trigger);
            let is_open = cx.document().has_attr(details, "open");
            let height = if is_open { Height::Auto } else { Height::Px(0.0) };
            cx.document_mut().set_height(panel, height);
            set_a11y(cx, panel, is_open);

            let index = self.widgets.len();
            cx.add_listener(trigger, EventKind::Click, index as u64);
            self.widgets.push(DisclosureWidget {
                details,
                trigger,
                panel,
            });
        }
        cx.flush_styles();
        log::debug!("[accordion] initialized {} widgets", self.widgets.len());
    }

    /// Flip a widget, animating unless reduced motion is on.
    pub fn toggle(&mut self, details: NodeId, cx: &mut Context<'_>) {
        match self.index_of(details) {
            Some(index) => self.toggle_index(index, cx),
            None => log::debug!("[accordion] toggle on unknown widget {details}"),
        }
    }

    fn toggle_index(&mut self, index: usize, cx: &mut Context<'_>) {
        let widget = self.widgets[index];
        let open = widget.is_open(cx.document());

        if cx.reduced_motion() {
            self.cancel_pending(index, cx);
            self.set_open(index, !open, cx);
            let height = if open { Height::Px(0.0) } else { Height::Auto };
            cx.document_mut().set_height(widget.panel, height);
            set_a11y(cx, widget.panel, !open);
            cx.flush_styles();
            return;
        }

        if open {
            self.animate_close(index, cx);
        } else {
            self.animate_open(index, cx);
        }
    }

    fn animate_open(&mut self, index: usize, cx: &mut Context<'_>) {
        self.cancel_pending(index, cx);
        let panel = self.widgets[index].panel;
        set_a11y(cx, panel, true);
        self.set_open(index, true, cx);

        cx.document_mut().set_height(panel, Height::Auto);
        let target = cx.measure_height(panel);
        cx.document_mut().set_height(panel, Height::Px(0.0));
        cx.flush_styles();

        self.begin(index, Motion::Opening, target, cx);
    }

    fn animate_close(&mut self, index: usize, cx: &mut Context<'_>) {
        self.cancel_pending(index, cx);
        let panel = self.widgets[index].panel;
        set_a11y(cx, panel, false);

        let start = cx.measure_height(panel);
        cx.document_mut().set_height(panel, Height::Px(start));
        self.set_open(index, false, cx);
        cx.flush_styles();

        self.begin(index, Motion::Closing, 0.0, cx);
    }

    fn begin(&mut self, index: usize, motion: Motion, target: f32, cx: &mut Context<'_>) {
        let panel = self.widgets[index].panel;
        let token = index as u64;
        let frame = cx.request_frame(token);
        let listener = cx.add_listener(panel, EventKind::TransitionEnd, token);
        let settle_timeout = cx.config().accordion_settle_timeout;
        let timeout = settle_timeout.map(|delay| cx.set_timeout(delay, token));

        log::trace!("[accordion] {motion:?} {panel} towards {target}px");
        self.pending.insert(
            index,
            PendingTransition {
                motion,
                target,
                listener,
                frame: Some(frame),
                timeout,
            },
        );
    }

    /// Drop the in-flight toggle of a widget without settling it.
    fn cancel_pending(&mut self, index: usize, cx: &mut Context<'_>) {
        let Some(pending) = self.pending.remove(&index) else {
            return;
        };
        cx.remove_listener(pending.listener);
        if let Some(frame) = pending.frame {
            cx.cancel_frame(frame);
        }
        if let Some(timer) = pending.timeout {
            cx.clear_timeout(timer);
        }
        log::trace!("[accordion] cancelled {:?} on widget {index}", pending.motion);
    }

    /// Finish the in-flight toggle of a widget.
    fn settle(&mut self, index: usize, cx: &mut Context<'_>) {
        let Some(pending) = self.pending.remove(&index) else {
            return;
        };
        let panel = self.widgets[index].panel;
        cx.remove_listener(pending.listener);
        if let Some(frame) = pending.frame {
            cx.cancel_frame(frame);
        }
        if let Some(timer) = pending.timeout {
            cx.clear_timeout(timer);
        }

        let height = match pending.motion {
            Motion::Opening => Height::Auto,
            Motion::Closing => Height::Px(0.0),
        };
        cx.document_mut().set_height(panel, height);
        cx.flush_styles();
        self.completions += 1;
        log::debug!("[accordion] widget {index} settled {}", height);
    }

    fn set_open(&self, index: usize, open: bool, cx: &mut Context<'_>) {
        let details = self.widgets[index].details;
        if open {
            cx.document_mut().set_attr(details, "open", "");
        } else {
            cx.document_mut().remove_attr(details, "open");
        }
    }
}

impl Behavior for AccordionController {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let root_selector = cx.config().accordion_root.clone();
        let root = match cx.document().select(&root_selector) {
            Ok(found) => found.first().copied(),
            Err(err) => {
                log::debug!("[accordion] bad root selector {root_selector:?}: {err}");
                None
            }
        };
        let Some(root) = root else {
            log::debug!("[accordion] no root matching {root_selector:?}");
            return;
        };

        let Ok(details) = Selector::parse("details") else {
            return;
        };
        let candidates = cx.document().query_selector_all(root, &details);
        if candidates.is_empty() {
            return;
        }
        self.initialize(&candidates, cx);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        let index = dispatch.token as usize;
        let Some(widget) = self.widgets.get(index).copied() else {
            return;
        };

        match dispatch.event {
            Event::Click { .. } => {
                cx.prevent_default();
                self.toggle_index(index, cx);
            }
            Event::TransitionEnd { target, property } => {
                // Children's transitions bubble up to the panel too
                if target != widget.panel || property != TransitionProperty::Height {
                    return;
                }
                match self.pending.get(&index) {
                    Some(p) if p.listener == dispatch.listener => self.settle(index, cx),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn on_frame(&mut self, token: u64, cx: &mut Context<'_>) {
        let index = token as usize;
        let Some(pending) = self.pending.get_mut(&index) else {
            return;
        };
        pending.frame = None;
        let (panel, target) = (self.widgets[index].panel, pending.target);
        cx.document_mut().set_height(panel, Height::Px(target));
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_>) {
        let index = token as usize;
        if let Some(pending) = self.pending.get_mut(&index) {
            pending.timeout = None;
            log::debug!("[accordion] widget {index} timed out, forcing settle");
            self.settle(index, cx);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn direct_child(
    cx: &Context<'_>,
    parent: NodeId,
    predicate: impl Fn(&Document, NodeId) -> bool,
) -> Option<NodeId> {
    let doc = cx.document();
    doc.children(parent)
        .iter()
        .copied()
        .find(|&child| predicate(doc, child))
}

/// The widget's `.faq-panel`, built from everything after the summary on
/// first use.
fn ensure_panel(cx: &mut Context<'_>, details: NodeId, trigger: NodeId) -> NodeId {
    let duration: Duration = cx.config().accordion_transition;
    let transitions = Transitions::new().height(duration, Easing::EaseInOut);

    if let Some(panel) = direct_child(cx, details, |doc, n| doc.has_class(n, PANEL_CLASS)) {
        // Server-rendered panel; keep its own transition if it has one
        let doc = cx.document_mut();
        if !doc[panel].transitions.has_any() {
            doc.set_transitions(panel, transitions);
        }
        return panel;
    }

    let doc = cx.document_mut();
    let panel = doc.create(Element::div().class(PANEL_CLASS).transitions(transitions));
    for sibling in doc.next_siblings(trigger) {
        doc.append_child(panel, sibling);
    }
    doc.append_child(details, panel);
    panel
}

fn set_a11y(cx: &mut Context<'_>, panel: NodeId, visible: bool) {
    let doc = cx.document_mut();
    if visible {
        doc.remove_attr(panel, "aria-hidden");
    } else {
        doc.set_attr(panel, "aria-hidden", "true");
    }
    doc.set_inert(panel, !visible);
}
