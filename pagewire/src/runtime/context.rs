use std::collections::VecDeque;
use std::time::Duration;

use pagedom::{
    AnimationState, Document, Easing, Event, EventKind, FrameId, IntersectionObserver, Layout,
    ListenerId, Listeners, NodeId, ObserverOptions, Rect, Scheduler, ScrollBehavior, TimerId,
    Viewport,
};
use url::Url;

use crate::behavior::BehaviorId;
use crate::clipboard::Clipboard;
use crate::config::PageConfig;
use crate::env::Environment;

/// Where a listener, frame, timer or observer callback goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Route {
    pub behavior: BehaviorId,
    pub token: u64,
}

/// Handle for an intersection observer created through [`Context::create_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

pub(crate) struct ObserverSlot {
    pub route: Route,
    pub observer: IntersectionObserver,
}

/// How a navigation was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Plain location change
    Direct,
    /// Wrapped in a view transition
    ViewTransition,
}

/// A navigation away from the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: Url,
    pub kind: NavigationKind,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SmoothScroll {
    pub from: f32,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
}

impl SmoothScroll {
    pub fn position(&self, now: Duration) -> (f32, bool) {
        let elapsed = now.saturating_sub(self.start);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = Easing::EaseInOut.apply(progress);
        (self.from + (self.to - self.from) * eased, false)
    }
}

/// Everything on a page except its behaviors.
pub(crate) struct PageState {
    pub doc: Document,
    pub animation: AnimationState,
    pub scheduler: Scheduler<Route>,
    pub listeners: Listeners<Route>,
    pub observers: Vec<ObserverSlot>,
    pub viewport: Viewport,
    pub env: Environment,
    pub config: PageConfig,
    pub clipboard: Box<dyn Clipboard>,
    pub now: Duration,
    pub location: Url,
    pub navigations: Vec<Navigation>,
    pub smooth_scroll: Option<SmoothScroll>,
    /// Window events raised during a callback, delivered once it returns.
    pub pending: VecDeque<Event>,
    pub default_prevented: bool,
}

impl PageState {
    pub fn layout(&self) -> Layout<'_> {
        Layout::new(&self.doc, &self.animation, self.now)
    }

    /// Jump to a scroll offset, clamped to the document. Queues a scroll
    /// event when the position changes.
    pub fn set_scroll(&mut self, top: f32) {
        let max = self.layout().max_scroll(&self.viewport);
        let top = top.clamp(0.0, max);
        if (top - self.viewport.scroll_y).abs() > f32::EPSILON {
            self.viewport.scroll_y = top;
            self.pending.push_back(Event::Scroll { scroll_y: top });
        }
    }
}

/// A behavior's handle on the page during a callback.
pub struct Context<'a> {
    state: &'a mut PageState,
    behavior: BehaviorId,
}

impl<'a> Context<'a> {
    pub(crate) fn new(state: &'a mut PageState, behavior: BehaviorId) -> Self {
        Self { state, behavior }
    }

    fn route(&self, token: u64) -> Route {
        Route {
            behavior: self.behavior,
            token,
        }
    }

    pub fn behavior(&self) -> BehaviorId {
        self.behavior
    }

    // Document

    pub fn document(&self) -> &Document {
        &self.state.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.state.doc
    }

    pub fn now(&self) -> Duration {
        self.state.now
    }

    pub fn config(&self) -> &PageConfig {
        &self.state.config
    }

    pub fn env(&self) -> &Environment {
        &self.state.env
    }

    pub fn reduced_motion(&self) -> bool {
        self.state.env.reduced_motion
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn location(&self) -> &Url {
        &self.state.location
    }

    // Style and layout

    /// Record current inline styles as the transition baseline.
    pub fn flush_styles(&mut self) {
        let state = &mut *self.state;
        state.animation.flush(&state.doc, state.now);
    }

    /// Rendered height after flushing styles, like reading `getBoundingClientRect().height`.
    pub fn measure_height(&mut self, id: NodeId) -> f32 {
        self.flush_styles();
        self.state.layout().rendered_height(id)
    }

    /// Viewport-relative extent after flushing styles.
    pub fn bounding_rect(&mut self, id: NodeId) -> Rect {
        self.flush_styles();
        self.state.layout().bounding_rect(id, &self.state.viewport)
    }

    // Scheduling

    pub fn request_frame(&mut self, token: u64) -> FrameId {
        let route = self.route(token);
        self.state.scheduler.request_frame(route)
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        self.state.scheduler.cancel_frame(id)
    }

    pub fn set_timeout(&mut self, delay: Duration, token: u64) -> TimerId {
        let route = self.route(token);
        let now = self.state.now;
        self.state.scheduler.set_timeout(now, delay, route)
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.state.scheduler.clear_timeout(id)
    }

    // Listeners

    pub fn add_listener(&mut self, target: NodeId, kind: EventKind, token: u64) -> ListenerId {
        let route = self.route(token);
        self.state.listeners.add(target, kind, route)
    }

    /// Listen for window events (scroll, resize, load, pageshow) or clicks
    /// anywhere in the document.
    pub fn add_window_listener(&mut self, kind: EventKind, token: u64) -> ListenerId {
        let root = self.state.doc.root();
        self.add_listener(root, kind, token)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.state.listeners.remove(id)
    }

    /// Cancel the default action of the event being dispatched.
    pub fn prevent_default(&mut self) {
        self.state.default_prevented = true;
    }

    // Observers

    /// None when the host has no intersection observer support.
    pub fn create_observer(&mut self, options: ObserverOptions, token: u64) -> Option<ObserverId> {
        if !self.state.env.intersection_observer {
            return None;
        }
        let route = self.route(token);
        self.state.observers.push(ObserverSlot {
            route,
            observer: IntersectionObserver::new(options),
        });
        Some(ObserverId(self.state.observers.len() - 1))
    }

    pub fn observe(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(slot) = self.state.observers.get_mut(observer.0) {
            slot.observer.observe(target);
        }
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(slot) = self.state.observers.get_mut(observer.0) {
            slot.observer.unobserve(target);
        }
    }

    // Window

    /// Scroll the window. Smooth scrolls animate over the configured duration.
    pub fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        let duration = self.state.config.smooth_scroll_duration;
        match behavior {
            ScrollBehavior::Smooth if !duration.is_zero() => {
                let max = self.state.layout().max_scroll(&self.state.viewport);
                self.state.smooth_scroll = Some(SmoothScroll {
                    from: self.state.viewport.scroll_y,
                    to: top.clamp(0.0, max),
                    start: self.state.now,
                    duration,
                });
            }
            _ => {
                self.state.smooth_scroll = None;
                self.state.set_scroll(top);
            }
        }
    }

    pub fn navigate(&mut self, url: Url, kind: NavigationKind) {
        log::debug!("[page] navigate to {url} ({kind:?})");
        self.state.location = url.clone();
        self.state.navigations.push(Navigation { url, kind });
    }

    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.state.clipboard.as_mut()
    }
}
