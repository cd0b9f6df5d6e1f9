pub mod animation;
pub mod element;
pub mod event;
pub mod intersect;
pub mod layout;
pub mod listeners;
pub mod scheduler;
pub mod selector;
pub mod transitions;
pub mod types;

pub use animation::{AnimationState, TransitionEnded, TransitionProperty};
pub use element::{Document, Element, Node, NodeId};
pub use event::{Event, EventKind, Modifiers};
pub use intersect::{IntersectionEntry, IntersectionObserver, Margin, ObserverOptions};
pub use layout::{Layout, Rect, Viewport};
pub use listeners::{ListenerId, Listeners};
pub use scheduler::{FrameId, Scheduler, TimerId};
pub use selector::{Selector, SelectorError};
pub use transitions::{Easing, TransitionConfig, Transitions};
pub use types::*;
