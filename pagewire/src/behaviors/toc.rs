//! Table of contents built from the page's `h2[id]` headings.
//!
//! Fills `#toc` with a link list when present and always adds a floating
//! mobile menu with its own toggle button. Both link sets follow the heading
//! currently near the top of the viewport.

use std::any::Any;

use pagedom::{Element, Event, EventKind, IntersectionEntry, Margin, NodeId, ObserverOptions};

use super::{offset_top, preferred_scroll, select_all};
use crate::behavior::{Behavior, Dispatch};
use crate::runtime::Context;

pub const MOBILE_MENU_ID: &str = "mobile-toc-menu";

/// What a registered click does. Listener tokens index into this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Jump(NodeId),
    JumpAndClose(NodeId),
    ToggleMenu,
}

#[derive(Debug, Default)]
pub struct TableOfContents {
    headings: Vec<NodeId>,
    container: Option<NodeId>,
    mobile_menu: Option<NodeId>,
    toggle: Option<NodeId>,
    actions: Vec<Action>,
}

impl TableOfContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headings(&self) -> &[NodeId] {
        &self.headings
    }

    pub fn mobile_menu(&self) -> Option<NodeId> {
        self.mobile_menu
    }

    pub fn toggle_button(&self) -> Option<NodeId> {
        self.toggle
    }

    fn register(&mut self, cx: &mut Context<'_>, target: NodeId, action: Action) {
        let token = self.actions.len() as u64;
        self.actions.push(action);
        cx.add_listener(target, EventKind::Click, token);
    }

    fn jump(&self, heading: NodeId, cx: &mut Context<'_>) {
        let top = offset_top(cx, heading);
        let behavior = preferred_scroll(cx);
        cx.scroll_to(top, behavior);
    }

    fn sync(&self, heading: NodeId, cx: &mut Context<'_>) {
        let Some(id) = cx.document()[heading].id.clone() else {
            return;
        };
        let wanted = format!("#{id}");

        let mut links = Vec::new();
        if let Some(container) = self.container {
            links.extend(links_in(cx, container, ".toc-link"));
        }
        if let Some(menu) = self.mobile_menu {
            links.extend(links_in(cx, menu, ".mobile-toc-link"));
        }

        let doc = cx.document_mut();
        for link in links {
            let matched = doc.attr(link, "href") == Some(wanted.as_str());
            doc.toggle_class(link, "active", Some(matched));
        }
    }
}

fn links_in(cx: &Context<'_>, scope: NodeId, selector: &str) -> Vec<NodeId> {
    match selector.parse() {
        Ok(selector) => cx.document().query_selector_all(scope, &selector),
        Err(_) => Vec::new(),
    }
}

fn link(heading_id: &str, label: &str, class: &str) -> Element {
    Element::a(format!("#{heading_id}")).class(class).text(label)
}

impl Behavior for TableOfContents {
    fn name(&self) -> &'static str {
        "toc"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.headings = select_all(cx, "h2[id]");
        if self.headings.is_empty() {
            return;
        }

        let entries: Vec<(NodeId, String, String)> = self
            .headings
            .iter()
            .filter_map(|&h| {
                let doc = cx.document();
                let id = doc[h].id.clone()?;
                Some((h, id, doc.text_content(h).trim().to_string()))
            })
            .collect();

        // Desktop list
        self.container = cx.document().get_element_by_id("toc");
        if let Some(container) = self.container {
            cx.document_mut().clear_children(container);
            let list = cx.document_mut().append(container, Element::new("ul"));
            for (heading, id, label) in &entries {
                let item = cx.document_mut().append(list, Element::new("li"));
                let anchor = cx.document_mut().append(item, link(id, label, "toc-link"));
                self.register(cx, anchor, Action::Jump(*heading));
            }
        }

        // Mobile menu and its toggle
        let body = cx.document().body();
        let menu = cx.document_mut().append(
            body,
            Element::div().id(MOBILE_MENU_ID).class("mobile-toc-menu"),
        );
        let nav = cx.document_mut().append(menu, Element::new("nav"));
        for (heading, id, label) in &entries {
            let anchor = cx.document_mut().append(nav, link(id, label, "mobile-toc-link"));
            self.register(cx, anchor, Action::JumpAndClose(*heading));
        }
        let toggle = cx
            .document_mut()
            .append(body, Element::button().class("mobile-toc-toggle"));
        self.register(cx, toggle, Action::ToggleMenu);
        self.mobile_menu = Some(menu);
        self.toggle = Some(toggle);

        let options = ObserverOptions::new()
            .margin_top(Margin::Percent(-20.0))
            .margin_bottom(Margin::Percent(-70.0));
        let Some(observer) = cx.create_observer(options, 0) else {
            log::debug!("[toc] no intersection observer support");
            return;
        };
        for &heading in &self.headings {
            cx.observe(observer, heading);
        }
    }

    fn on_event(&mut self, dispatch: &Dispatch, cx: &mut Context<'_>) {
        if !matches!(dispatch.event, Event::Click { .. }) {
            return;
        }
        let Some(&action) = self.actions.get(dispatch.token as usize) else {
            return;
        };
        match action {
            Action::Jump(heading) => {
                cx.prevent_default();
                self.jump(heading, cx);
            }
            Action::JumpAndClose(heading) => {
                cx.prevent_default();
                self.jump(heading, cx);
                if let Some(menu) = self.mobile_menu {
                    cx.document_mut().remove_class(menu, "is-open");
                }
            }
            Action::ToggleMenu => {
                if let Some(menu) = self.mobile_menu {
                    cx.document_mut().toggle_class(menu, "is-open", None);
                }
            }
        }
    }

    fn on_intersect(&mut self, _token: u64, entries: &[IntersectionEntry], cx: &mut Context<'_>) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            self.sync(entry.target, cx);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
