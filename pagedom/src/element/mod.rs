mod document;
mod node;

pub use document::{Document, Node, NodeId};
pub use node::Element;
