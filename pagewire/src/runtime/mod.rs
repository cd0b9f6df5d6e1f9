//! The page runtime: owns the document, drives the clock and routes callbacks
//! to behaviors.

mod context;

pub use context::{Context, Navigation, NavigationKind, ObserverId};

use std::collections::VecDeque;
use std::time::Duration;

use pagedom::{
    AnimationState, Document, Event, EventKind, Layout, Listeners, Modifiers, NodeId, Scheduler,
    Selector, Viewport,
};
use url::Url;

use crate::behavior::{Behavior, BehaviorId, Dispatch};
use crate::behaviors;
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::PageConfig;
use crate::env::Environment;
use context::{PageState, Route};

/// One animation frame at 60Hz.
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on event/observer rounds after a single input.
const MAX_SETTLE_ROUNDS: usize = 32;

/// A loaded page with its behaviors.
///
/// All work happens on the caller's thread: inputs (`click`, `scroll_to`,
/// `resize`, ...) dispatch immediately, and [`Page::tick`] advances the
/// virtual clock to run animation frames, transitions and timers.
pub struct Page {
    state: PageState,
    behaviors: Vec<Option<Box<dyn Behavior>>>,
}

impl Page {
    pub fn new(doc: Document, env: Environment, config: PageConfig) -> Self {
        let mut animation = AnimationState::new();
        animation.set_reduced_motion(env.reduced_motion);
        animation.flush(&doc, Duration::ZERO);

        Self {
            state: PageState {
                doc,
                animation,
                scheduler: Scheduler::new(),
                listeners: Listeners::new(),
                observers: Vec::new(),
                viewport: env.viewport,
                location: env.location.clone(),
                env,
                config,
                clipboard: Box::new(MemoryClipboard::new()),
                now: Duration::ZERO,
                navigations: Vec::new(),
                smooth_scroll: None,
                pending: VecDeque::new(),
                default_prevented: false,
            },
            behaviors: Vec::new(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.state.clipboard = Box::new(clipboard);
        self
    }

    /// Attach a behavior and run its `attach` hook.
    pub fn attach(&mut self, behavior: impl Behavior) -> BehaviorId {
        self.attach_boxed(Box::new(behavior))
    }

    pub fn attach_boxed(&mut self, behavior: Box<dyn Behavior>) -> BehaviorId {
        let id = BehaviorId(self.behaviors.len());
        log::debug!("[page] attach {} as {:?}", behavior.name(), id);
        self.behaviors.push(Some(behavior));
        self.call(id, |b, cx| b.attach(cx));
        self.settle();
        id
    }

    /// Attach every behavior from [`behaviors::standard`].
    pub fn attach_standard(&mut self) -> Vec<BehaviorId> {
        behaviors::standard()
            .into_iter()
            .map(|behavior| self.attach_boxed(behavior))
            .collect()
    }

    // Accessors

    pub fn document(&self) -> &Document {
        &self.state.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.state.doc
    }

    pub fn now(&self) -> Duration {
        self.state.now
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn config(&self) -> &PageConfig {
        &self.state.config
    }

    pub fn env(&self) -> &Environment {
        &self.state.env
    }

    pub fn location(&self) -> &Url {
        &self.state.location
    }

    pub fn navigations(&self) -> &[Navigation] {
        &self.state.navigations
    }

    pub fn clipboard(&self) -> &dyn Clipboard {
        self.state.clipboard.as_ref()
    }

    /// The clipboard as its concrete type, to inspect test doubles.
    pub fn clipboard_as<C: Clipboard>(&self) -> Option<&C> {
        self.state.clipboard.as_any().downcast_ref::<C>()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.state.animation
    }

    pub fn layout(&self) -> Layout<'_> {
        self.state.layout()
    }

    /// Number of listeners of `kind` attached directly to `target`.
    pub fn listener_count(&self, target: NodeId, kind: EventKind) -> usize {
        self.state.listeners.count(target, kind)
    }

    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.state.doc.get_element_by_id(id)
    }

    pub fn behavior<B: Behavior>(&self, id: BehaviorId) -> Option<&B> {
        self.behaviors
            .get(id.0)?
            .as_deref()?
            .as_any()
            .downcast_ref::<B>()
    }

    /// Run `f` against a concrete behavior with a live context.
    pub fn with_behavior<B: Behavior, R>(
        &mut self,
        id: BehaviorId,
        f: impl FnOnce(&mut B, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let result = self.call(id, |b, cx| {
            b.as_any_mut().downcast_mut::<B>().map(|b| f(b, cx))
        })?;
        self.settle();
        result
    }

    // Input

    /// Fire the window `load` event.
    pub fn load(&mut self) {
        self.dispatch(Event::Load);
        self.settle();
    }

    /// Fire `pageshow`, `persisted` when restored from the back/forward cache.
    pub fn page_show(&mut self, persisted: bool) {
        self.dispatch(Event::PageShow { persisted });
        self.settle();
    }

    /// Click an element. Returns false if a listener prevented the default action.
    pub fn click(&mut self, target: NodeId) -> bool {
        self.click_with(target, Modifiers::new())
    }

    pub fn click_with(&mut self, target: NodeId, modifiers: Modifiers) -> bool {
        let prevented = self.dispatch(Event::Click { target, modifiers });
        if !prevented {
            self.click_default_action(target);
        }
        self.settle();
        !prevented
    }

    /// User scroll: jumps immediately and interrupts any smooth scroll.
    pub fn scroll_to(&mut self, top: f32) {
        self.state.smooth_scroll = None;
        self.state.set_scroll(top);
        self.settle();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.viewport.width = width;
        self.state.viewport.height = height;
        self.dispatch(Event::Resize { width, height });
        self.settle();
    }

    // Clock

    /// Advance the clock by `dt`: run requested frames, progress transitions
    /// and smooth scrolling, then fire due timers.
    pub fn tick(&mut self, dt: Duration) {
        self.state.now += dt;
        let now = self.state.now;

        for (_, route) in self.state.scheduler.take_frames() {
            self.call(route.behavior, |b, cx| b.on_frame(route.token, cx));
        }

        {
            let state = &mut self.state;
            state.animation.flush(&state.doc, now);
        }

        if let Some(scroll) = self.state.smooth_scroll {
            let (top, done) = scroll.position(now);
            self.state.set_scroll(top);
            if done {
                self.state.smooth_scroll = None;
            }
        }

        for ended in self.state.animation.advance(now) {
            self.dispatch(Event::TransitionEnd {
                target: ended.target,
                property: ended.property,
            });
        }

        while let Some((_, route)) = self.state.scheduler.pop_due(now) {
            self.call(route.behavior, |b, cx| b.on_timer(route.token, cx));
        }

        self.settle();
    }

    /// Tick in whole frames until `total` has elapsed.
    pub fn advance(&mut self, total: Duration) {
        let end = self.state.now + total;
        while self.state.now < end {
            let step = FRAME.min(end - self.state.now);
            self.tick(step);
        }
    }

    /// True when no frame, timer, transition or smooth scroll is outstanding.
    pub fn is_idle(&self) -> bool {
        !self.state.scheduler.has_frames()
            && !self.state.scheduler.has_timers()
            && !self.state.animation.has_active_transitions()
            && self.state.smooth_scroll.is_none()
    }

    /// Tick frame by frame until idle or `limit` has elapsed. Returns whether
    /// the page went idle.
    pub fn run_until_idle(&mut self, limit: Duration) -> bool {
        let end = self.state.now + limit;
        while !self.is_idle() {
            if self.state.now >= end {
                return false;
            }
            self.tick(FRAME);
        }
        true
    }

    // Internals

    fn call<R>(
        &mut self,
        id: BehaviorId,
        f: impl FnOnce(&mut dyn Behavior, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.behaviors.get_mut(id.0)?.take()?;
        let result = {
            let mut cx = Context::new(&mut self.state, id);
            f(behavior.as_mut(), &mut cx)
        };
        self.behaviors[id.0] = Some(behavior);
        Some(result)
    }

    /// Deliver an event along its bubbling path. Returns whether the default
    /// action was prevented.
    fn dispatch(&mut self, event: Event) -> bool {
        let target = event.target().unwrap_or(self.state.doc.root());
        let path = self
            .state
            .listeners
            .bubble_path(&self.state.doc, target, event.kind());
        log::trace!("[page] dispatch {:?} to {} listeners", event, path.len());

        self.state.default_prevented = false;
        for (listener, current_target, route) in path {
            // Removed by an earlier listener during this dispatch
            if !self.state.listeners.contains(listener) {
                continue;
            }
            let dispatch = Dispatch {
                event,
                current_target,
                listener,
                token: route.token,
            };
            self.call(route.behavior, |b, cx| b.on_event(&dispatch, cx));
        }
        std::mem::take(&mut self.state.default_prevented)
    }

    /// What the host does with an unhandled click: follow links and toggle
    /// `<details>` from their summary.
    fn click_default_action(&mut self, target: NodeId) {
        let doc = &self.state.doc;
        let anchor = Selector::parse("a[href]")
            .ok()
            .and_then(|sel| doc.closest(target, &sel));
        if let Some(anchor) = anchor {
            let href = doc.attr(anchor, "href").unwrap_or_default().to_string();
            self.follow_link(&href);
            return;
        }

        let summary = Selector::parse("details > summary")
            .ok()
            .and_then(|sel| doc.closest(target, &sel));
        if let Some(details) = summary.and_then(|s| doc.parent(s)) {
            if doc.has_attr(details, "open") {
                self.state.doc.remove_attr(details, "open");
            } else {
                self.state.doc.set_attr(details, "open", "");
            }
        }
    }

    fn follow_link(&mut self, href: &str) {
        let Ok(url) = self.state.location.join(href) else {
            log::debug!("[page] ignoring unparsable href {href:?}");
            return;
        };

        let same_document = {
            let (mut a, mut b) = (url.clone(), self.state.location.clone());
            a.set_fragment(None);
            b.set_fragment(None);
            a == b
        };

        if same_document && url.fragment().is_some() {
            let fragment = url.fragment().unwrap_or_default().to_string();
            self.state.location = url;
            let target = urlencoding::decode(&fragment)
                .ok()
                .and_then(|id| self.state.doc.get_element_by_id(&id));
            if let Some(target) = target {
                let top = self.state.layout().document_top(target);
                self.state.smooth_scroll = None;
                self.state.set_scroll(top);
            }
            return;
        }

        self.state.location = url.clone();
        self.state.navigations.push(Navigation {
            url,
            kind: NavigationKind::Direct,
        });
    }

    /// Deliver queued window events and observer callbacks until quiet.
    fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            let mut busy = false;
            while let Some(event) = self.state.pending.pop_front() {
                busy = true;
                self.dispatch(event);
            }
            busy |= self.check_intersections();
            if !busy {
                return;
            }
        }
        log::debug!("[page] settle did not converge");
    }

    fn check_intersections(&mut self) -> bool {
        let mut deliveries: Vec<(Route, Vec<_>)> = Vec::new();
        {
            let state = &mut self.state;
            let layout = Layout::new(&state.doc, &state.animation, state.now);
            for slot in &mut state.observers {
                let entries = slot.observer.check(&layout, &state.viewport);
                if !entries.is_empty() {
                    deliveries.push((slot.route, entries));
                }
            }
        }

        let delivered = !deliveries.is_empty();
        for (route, entries) in deliveries {
            self.call(route.behavior, |b, cx| b.on_intersect(route.token, &entries, cx));
        }
        delivered
    }
}
