use std::collections::BTreeMap;

use crate::transitions::Transitions;
use crate::types::{Height, Style};

/// Owned element description, used to build subtrees before inserting them
/// into a [`Document`](super::Document).
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    /// Height of the element's own content (text line, image, padding),
    /// excluding children.
    pub intrinsic_height: f32,
    pub style: Style,
    pub transitions: Transitions,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn a(href: impl Into<String>) -> Self {
        Self::new("a").attr("href", href)
    }

    pub fn button() -> Self {
        Self::new("button")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    // Content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn intrinsic_height(mut self, height: f32) -> Self {
        self.intrinsic_height = height;
        self
    }

    // Visual
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn height(mut self, height: Height) -> Self {
        self.style.height = height;
        self
    }

    pub fn transitions(mut self, transitions: Transitions) -> Self {
        self.transitions = transitions;
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}
