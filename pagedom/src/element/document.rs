use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use slotmap::{new_key_type, SlotMap};

use super::Element;
use crate::selector::{Selector, SelectorError};
use crate::transitions::Transitions;
use crate::types::{Height, Overflow, Style};

new_key_type! {
    /// Handle to a node in a [`Document`]. Ids of destroyed nodes are never
    /// handed out again.
    pub struct NodeId;
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{:?}", self.0)
    }
}

/// A node stored in the document arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub intrinsic_height: f32,
    pub style: Style,
    pub transitions: Transitions,
    /// Whether the subtree is removed from interaction and the accessibility tree.
    pub inert: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn from_element(element: &Element) -> Self {
        Self {
            tag: element.tag.clone(),
            id: element.id.clone(),
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            text: element.text.clone(),
            intrinsic_height: element.intrinsic_height,
            style: element.style,
            transitions: element.transitions,
            inert: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Arena-backed element tree rooted at `<html>` with a `<body>` child.
///
/// [`Document::remove`] only detaches a node, which can be re-attached later.
/// [`Document::destroy`] frees a subtree; lookups with its ids return nothing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
            body: NodeId::default(),
        };
        doc.root = doc.create(Element::new("html"));
        doc.body = doc.append(doc.root, Element::new("body"));
        doc
    }

    /// Build a document whose body holds the given elements.
    pub fn with_body(children: impl IntoIterator<Item = Element>) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        for child in children {
            doc.append(body, child);
        }
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every live node id, attached or not.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    // Tree construction

    /// Create a detached subtree from an element description.
    pub fn create(&mut self, element: Element) -> NodeId {
        let id = self.nodes.insert(Node::from_element(&element));
        for child in element.children {
            let child_id = self.create(child);
            self.nodes[child_id].parent = Some(id);
            self.nodes[id].children.push(child_id);
        }
        id
    }

    /// Create a subtree and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(element);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Returns false (and changes nothing) when either id is unknown or the
    /// move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.remove(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Detach a node from its parent. The subtree stays intact.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else { return };
        self.nodes[parent].children.retain(|&c| c != id);
        self.nodes[id].parent = None;
    }

    /// Detach a node and free it with its whole subtree. Returns how many
    /// nodes were freed. The root and body cannot be destroyed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if id == self.root || id == self.body || !self.nodes.contains_key(id) {
            return 0;
        }
        self.remove(id);
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                freed += 1;
            }
        }
        freed
    }

    /// Free every child of a node, with their subtrees.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.destroy(child);
        }
    }

    // Traversal

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Siblings that follow `id` under the same parent.
    pub fn next_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        self.children(parent)
            .iter()
            .skip_while(|&&c| c != id)
            .skip(1)
            .copied()
            .collect()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Descendants in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// True if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// True if the node is attached to this document's root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.nodes[n].id.as_deref() == Some(element_id))
    }

    // Selectors

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// All descendants of `scope` matching the selector, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// Parse and run a selector against the whole document.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_selector_all(self.root, &selector))
    }

    /// Nearest inclusive ancestor matching the selector.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| selector.matches(self, n))
    }

    // Attributes

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.insert(name.into(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.remove(name);
        }
    }

    // Classes

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, or force it on/off. Returns whether the class is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> bool {
        let present = force.unwrap_or_else(|| !self.has_class(id, class));
        if present {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
        present
    }

    // Text

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    /// Replace the node's content with a single text value, freeing children.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.clear_children(id);
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.into());
        }
    }

    /// Own text followed by every descendant's text, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| self.text(n))
            .collect()
    }

    // Style

    pub fn style(&self, id: NodeId) -> Style {
        self.node(id).map(|n| n.style).unwrap_or_default()
    }

    pub fn height(&self, id: NodeId) -> Height {
        self.style(id).height
    }

    pub fn set_height(&mut self, id: NodeId, height: Height) {
        if let Some(node) = self.node_mut(id) {
            node.style.height = height;
        }
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        if let Some(node) = self.node_mut(id) {
            node.style.opacity = opacity;
        }
    }

    pub fn set_overflow(&mut self, id: NodeId, overflow: Overflow) {
        if let Some(node) = self.node_mut(id) {
            node.style.overflow = overflow;
        }
    }

    pub fn set_transitions(&mut self, id: NodeId, transitions: Transitions) {
        if let Some(node) = self.node_mut(id) {
            node.transitions = transitions;
        }
    }

    pub fn is_inert(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.inert)
    }

    pub fn set_inert(&mut self, id: NodeId, inert: bool) {
        if let Some(node) = self.node_mut(id) {
            node.inert = inert;
        }
    }
}

impl Index<NodeId> for Document {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}
