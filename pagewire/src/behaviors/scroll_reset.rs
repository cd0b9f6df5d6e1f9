//! Start every visit at the top of the page.
//!
//! Runs on attach, on `load` and when the page is restored from the
//! back/forward cache, each time again after a short delay once late layout
//! shifts have happened. A location fragment naming an existing element
//! wins over the reset.

use std::any::Any;

use pagedom::{Event, EventKind, ListenerId, ScrollBehavior};

use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

const LOAD: u64 = 0;
const PAGE_SHOW: u64 = 1;
const RETRY: u64 = 2;

#[derive(Debug, Default)]
pub struct ScrollReset {
    load: Option<ListenerId>,
    resets: usize,
}

impl ScrollReset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets that ran, not counting those skipped for a fragment target.
    pub fn resets(&self) -> usize {
        self.resets
    }

    fn reset(&mut self, cx: &mut Context<'_>) {
        if has_fragment_target(cx) {
            return;
        }
        cx.scroll_to(0.0, ScrollBehavior::Auto);
        self.resets += 1;
    }

    fn reset_and_retry(&mut self, cx: &mut Context<'_>) {
        self.reset(cx);
        let delay = cx.config().scroll_reset_retry;
        cx.set_timeout(delay, RETRY);
    }
}

fn has_fragment_target(cx: &Context<'_>) -> bool {
    let Some(fragment) = cx.location().fragment().filter(|f| !f.is_empty()) else {
        return false;
    };
    match urlencoding::decode(fragment) {
        Ok(id) => cx.document().get_element_by_id(&id).is_some(),
        Err(_) => false,
    }
}

impl Behavior for ScrollReset {
    fn name(&self) -> &'static str {
        "scroll-reset"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.reset(cx);
        self.load = Some(cx.add_window_listener(EventKind::Load, LOAD));
        cx.add_window_listener(EventKind::PageShow, PAGE_SHOW);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        match dispatch.event {
            Event::Load => {
                // Only the first load counts
                if let Some(listener) = self.load.take() {
                    cx.remove_listener(listener);
                    self.reset_and_retry(cx);
                }
            }
            Event::PageShow { persisted: true } => self.reset_and_retry(cx),
            _ => {}
        }
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_>) {
        if token == RETRY {
            self.reset(cx);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
