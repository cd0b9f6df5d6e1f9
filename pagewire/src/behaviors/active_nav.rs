//! Highlights the navigation link of the section being read.

use std::any::Any;

use pagedom::{IntersectionEntry, Margin, NodeId, ObserverOptions};

use super::{fragment_target, select_all};
use crate::behavior::Behavior;
use crate::runtime::Context;

const SECTIONS: u64 = 0;

#[derive(Debug, Default)]
pub struct ActiveNav {
    links: Vec<NodeId>,
    sections: Vec<NodeId>,
}

impl ActiveNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[NodeId] {
        &self.sections
    }

    fn set_active(&self, section: NodeId, cx: &mut Context<'_>) {
        let Some(id) = cx.document()[section].id.clone() else {
            return;
        };
        let wanted = format!("#{id}");
        let doc = cx.document_mut();
        for &link in &self.links {
            let matched = doc.attr(link, "href") == Some(wanted.as_str());
            doc.toggle_class(link, "active", Some(matched));
            if matched {
                doc.set_attr(link, "aria-current", "page");
            } else {
                doc.remove_attr(link, "aria-current");
            }
        }
    }
}

impl Behavior for ActiveNav {
    fn name(&self) -> &'static str {
        "active-nav"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.links = select_all(cx, ".nav-link, .mobile-nav-link");
        if self.links.is_empty() {
            return;
        }

        for &link in &self.links {
            let href = cx.document().attr(link, "href").unwrap_or_default();
            if let Some(section) = fragment_target(cx, href) {
                if !self.sections.contains(&section) {
                    self.sections.push(section);
                }
            }
        }
        if self.sections.is_empty() {
            return;
        }

        let options = ObserverOptions::new()
            .margin_top(Margin::Percent(-20.0))
            .margin_bottom(Margin::Percent(-70.0));
        let Some(observer) = cx.create_observer(options, SECTIONS) else {
            log::debug!("[active-nav] no intersection observer support");
            return;
        };
        for &section in &self.sections {
            cx.observe(observer, section);
        }
    }

    fn on_intersect(&mut self, _token: u64, entries: &[IntersectionEntry], cx: &mut Context<'_>) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            self.set_active(entry.target, cx);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
