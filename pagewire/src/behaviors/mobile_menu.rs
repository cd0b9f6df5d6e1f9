//! Hamburger menu for narrow viewports.

use std::any::Any;

use pagedom::{Event, EventKind, NodeId, Overflow, Selector};

use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

pub const BUTTON_ID: &str = "mobile-menu-button";
pub const MENU_ID: &str = "mobile-menu";
pub const ICON_PATH_ID: &str = "menu-icon-path";

pub const HAMBURGER_PATH: &str = "M5 7h14M5 12h14M5 17h14";
pub const CLOSE_PATH: &str = "M6 18L18 6M6 6l12 12";

const TOGGLE: u64 = 0;
const CLOSE: u64 = 1;

#[derive(Debug, Default)]
pub struct MobileMenu {
    button: Option<NodeId>,
}

impl MobileMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.button.is_some()
    }
}

/// Open or close the menu. Does nothing unless both the button and the menu
/// exist.
pub fn set_state(cx: &mut Context<'_>, open: bool) {
    let doc = cx.document();
    let (Some(button), Some(menu)) = (
        doc.get_element_by_id(BUTTON_ID),
        doc.get_element_by_id(MENU_ID),
    ) else {
        return;
    };
    let icon = doc.get_element_by_id(ICON_PATH_ID);
    let body = doc.body();

    let doc = cx.document_mut();
    doc.set_attr(button, "aria-expanded", open.to_string());
    doc.toggle_class(menu, "is-open", Some(open));
    if let Some(icon) = icon {
        doc.set_attr(icon, "d", if open { CLOSE_PATH } else { HAMBURGER_PATH });
    }
    // Lock page scrolling behind the open menu
    doc.set_overflow(body, if open { Overflow::Hidden } else { Overflow::Visible });
    log::debug!("[mobile-menu] open={open}");
}

pub fn is_open(cx: &Context<'_>) -> bool {
    let doc = cx.document();
    doc.get_element_by_id(BUTTON_ID)
        .and_then(|b| doc.attr(b, "aria-expanded"))
        == Some("true")
}

impl Behavior for MobileMenu {
    fn name(&self) -> &'static str {
        "mobile-menu"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let doc = cx.document();
        let (Some(button), Some(menu)) = (
            doc.get_element_by_id(BUTTON_ID),
            doc.get_element_by_id(MENU_ID),
        ) else {
            return;
        };
        let links = Selector::parse("a")
            .map(|sel| doc.query_selector_all(menu, &sel))
            .unwrap_or_default();

        cx.add_listener(button, EventKind::Click, TOGGLE);
        for link in links {
            cx.add_listener(link, EventKind::Click, CLOSE);
        }
        self.button = Some(button);
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        if !matches!(dispatch.event, Event::Click { .. }) {
            return;
        }
        match dispatch.token {
            TOGGLE => {
                let open = is_open(cx);
                set_state(cx, !open);
            }
            CLOSE => set_state(cx, false),
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
