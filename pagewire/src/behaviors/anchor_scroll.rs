//! In-page `#fragment` links scroll with room for the fixed header.

use std::any::Any;
use std::collections::HashMap;

use pagedom::{Event, EventKind};

use super::{fragment_target, mobile_menu, offset_top, preferred_scroll, select_all};
use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

const CLICK: u64 = 0;

#[derive(Debug, Default)]
pub struct AnchorScroll {
    links: usize,
    /// Scrolls deferred to the next frame, by frame token.
    deferred: HashMap<u64, f32>,
    next_token: u64,
}

impl AnchorScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links wired up.
    pub fn links(&self) -> usize {
        self.links
    }
}

impl Behavior for AnchorScroll {
    fn name(&self) -> &'static str {
        "anchor-scroll"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        for link in select_all(cx, r##"a[href^="#"]"##) {
            cx.add_listener(link, EventKind::Click, CLICK);
            self.links += 1;
        }
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        if !matches!(dispatch.event, Event::Click { .. }) {
            return;
        }
        let href = cx
            .document()
            .attr(dispatch.current_target, "href")
            .unwrap_or_default()
            .to_string();
        let Some(target) = fragment_target(cx, &href) else {
            return;
        };

        cx.prevent_default();
        let top = offset_top(cx, target);

        if !cx.config().is_desktop(cx.viewport().width) {
            // The scroll lock has to come off before the scroll can happen
            mobile_menu::set_state(cx, false);
            self.next_token += 1;
            self.deferred.insert(self.next_token, top);
            cx.request_frame(self.next_token);
            return;
        }

        let behavior = preferred_scroll(cx);
        cx.scroll_to(top, behavior);
    }

    fn on_frame(&mut self, token: u64, cx: &mut Context<'_>) {
        if let Some(top) = self.deferred.remove(&token) {
            let behavior = preferred_scroll(cx);
            cx.scroll_to(top, behavior);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
