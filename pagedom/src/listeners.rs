//! Event listener registry.

use std::collections::BTreeMap;

use crate::element::{Document, NodeId};
use crate::event::EventKind;

/// Handle returned by [`Listeners::add`]; the only way to detach a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Registration<T> {
    target: NodeId,
    kind: EventKind,
    payload: T,
}

/// Listeners keyed by (target, event kind), each carrying an opaque payload
/// that tells the host who to call.
#[derive(Debug, Clone)]
pub struct Listeners<T> {
    next_id: u64,
    registrations: BTreeMap<ListenerId, Registration<T>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            registrations: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: NodeId, kind: EventKind, payload: T) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.insert(
            id,
            Registration {
                target,
                kind,
                payload,
            },
        );
        id
    }

    /// Detach a listener. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.registrations.remove(&id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.registrations.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Number of listeners of `kind` attached directly to `target`.
    pub fn count(&self, target: NodeId, kind: EventKind) -> usize {
        self.registrations
            .values()
            .filter(|r| r.target == target && r.kind == kind)
            .count()
    }

    /// Listeners to call for an event at `target`, in bubbling order: the
    /// target first, then each ancestor up to the root. Within one node,
    /// listeners run in registration order.
    pub fn bubble_path(
        &self,
        doc: &Document,
        target: NodeId,
        kind: EventKind,
    ) -> Vec<(ListenerId, NodeId, T)> {
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .flat_map(|node| {
                self.registrations
                    .iter()
                    .filter(move |(_, r)| r.target == node && r.kind == kind)
                    .map(move |(&id, r)| (id, node, r.payload.clone()))
            })
            .collect()
    }
}
