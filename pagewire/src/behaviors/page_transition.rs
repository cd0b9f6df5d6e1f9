//! Fade out before following an internal link.
//!
//! Same-origin link clicks are intercepted. With view transition support the
//! navigation happens right away inside a view transition; otherwise the
//! overlay gets `is-leaving` and the navigation follows after a short delay.

use std::any::Any;
use std::collections::HashMap;

use pagedom::{Element, Event, EventKind, Modifiers, NodeId, Selector};
use url::Url;

use crate::behavior::{Behavior, Dispatch};
use crate::runtime::{Context, NavigationKind};

pub const OVERLAY_CLASS: &str = "page-transition-overlay";

const CLICK: u64 = 0;
const PAGE_SHOW: u64 = 1;

const SKIPPED_PREFIXES: [&str; 4] = ["#", "mailto:", "tel:", "javascript:"];

#[derive(Debug, Default)]
pub struct PageTransitions {
    overlay: Option<NodeId>,
    /// Delayed navigations, by timer token.
    leaving: HashMap<u64, Url>,
    next_token: u64,
}

impl PageTransitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    /// The URL to navigate to if this click should be intercepted.
    fn intercept(&self, cx: &Context<'_>, target: NodeId, modifiers: Modifiers) -> Option<Url> {
        let doc = cx.document();
        let selector = Selector::parse("a[href]").ok()?;
        let link = doc.closest(target, &selector)?;
        let href = doc.attr(link, "href").unwrap_or_default();

        if href.is_empty()
            || SKIPPED_PREFIXES.iter().any(|p| href.starts_with(p))
            || doc.attr(link, "target") == Some("_blank")
            || doc.has_attr(link, "download")
            || !modifiers.none()
        {
            return None;
        }

        // Relative hrefs are checked against the site root
        let location = cx.location();
        let origin = Url::parse(&location.origin().ascii_serialization()).ok()?;
        let resolved = origin.join(href).ok()?;
        if resolved.origin() != location.origin() {
            return None;
        }
        location.join(href).ok()
    }
}

impl Behavior for PageTransitions {
    fn name(&self) -> &'static str {
        "page-transition"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        if cx.reduced_motion() {
            return;
        }
        let body = cx.document().body();
        let overlay = cx
            .document_mut()
            .append(body, Element::div().class(OVERLAY_CLASS));
        self.overlay = Some(overlay);

        cx.add_window_listener(EventKind::Click, CLICK);
        cx.add_window_listener(EventKind::PageShow, PAGE_SHOW);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        let Some(overlay) = self.overlay else { return };
        match dispatch.event {
            Event::Click { target, modifiers } => {
                let Some(url) = self.intercept(cx, target, modifiers) else {
                    return;
                };
                cx.prevent_default();

                if cx.env().view_transitions {
                    cx.navigate(url, NavigationKind::ViewTransition);
                    return;
                }

                cx.document_mut().add_class(overlay, "is-leaving");
                self.next_token += 1;
                self.leaving.insert(self.next_token, url);
                let delay = cx.config().navigation_delay;
                cx.set_timeout(delay, self.next_token);
            }
            Event::PageShow { persisted: true } => {
                cx.document_mut().remove_class(overlay, "is-leaving");
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_>) {
        if let Some(url) = self.leaving.remove(&token) {
            cx.navigate(url, NavigationKind::Direct);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
