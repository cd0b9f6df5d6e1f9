//! The trait every page enhancement implements.

use std::any::Any;

use pagedom::{Event, IntersectionEntry, ListenerId, NodeId};

use crate::runtime::Context;

/// Index of an attached behavior within its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviorId(pub(crate) usize);

/// An event as seen by one listener.
#[derive(Debug, Clone, Copy)]
pub struct Dispatch {
    pub event: Event,
    /// The node the listener was registered on.
    pub current_target: NodeId,
    pub listener: ListenerId,
    /// Token the behavior passed when registering.
    pub token: u64,
}

/// A page enhancement.
///
/// Behaviors never hold references into the page. They register listeners,
/// frames, timers and observers through the [`Context`] with a `u64` token of
/// their choosing, and the page hands that token back when the callback fires.
pub trait Behavior: Any {
    fn name(&self) -> &'static str;

    /// Called once when the behavior is attached to a page.
    fn attach(&mut self, cx: &mut Context<'_>);

    fn on_event(&mut self, _dispatch: &Dispatch, _cx: &mut Context<'_>) {}

    fn on_frame(&mut self, _token: u64, _cx: &mut Context<'_>) {}

    fn on_timer(&mut self, _token: u64, _cx: &mut Context<'_>) {}

    fn on_intersect(&mut self, _token: u64, _entries: &[IntersectionEntry], _cx: &mut Context<'_>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
