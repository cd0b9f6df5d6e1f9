use std::any::Any;

use pagedom::{Event, EventKind, NodeId, ScrollBehavior};

use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

const SCROLL: u64 = 0;
const CLICK: u64 = 1;

/// `#back-to-top` shows past a scroll threshold and smooth-scrolls home.
#[derive(Debug, Default)]
pub struct BackToTop {
    button: Option<NodeId>,
}

impl BackToTop {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for BackToTop {
    fn name(&self) -> &'static str {
        "back-to-top"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let Some(button) = cx.document().get_element_by_id("back-to-top") else {
            return;
        };
        cx.add_window_listener(EventKind::Scroll, SCROLL);
        cx.add_listener(button, EventKind::Click, CLICK);
        self.button = Some(button);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        let Some(button) = self.button else { return };
        match (dispatch.token, dispatch.event) {
            (SCROLL, Event::Scroll { scroll_y }) => {
                let visible = scroll_y > cx.config().back_to_top_threshold;
                cx.document_mut().toggle_class(button, "is-visible", Some(visible));
            }
            (CLICK, Event::Click { .. }) => cx.scroll_to(0.0, ScrollBehavior::Smooth),
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
