//! Graph change notifications
//!
//! Captures mutations of the vertex/edge sets for downstream consumers
//! (layout invalidation, redraw). Listeners are an explicit callback list on
//! the graph, not global event state, and are invoked synchronously on the
//! mutating thread; no cross-thread marshaling is performed here.

use super::types::{EdgeId, VertexId};

/// A change to a graph's vertex or edge set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    VertexAdded { id: VertexId },
    VertexRemoved { id: VertexId },
    EdgeAdded { id: EdgeId },
    EdgeRemoved { id: EdgeId },
    Cleared,
}

/// Handle for a registered listener, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A registered change callback
pub type GraphListener = Box<dyn Fn(&GraphEvent) + Send>;

/// Explicit listener list
///
/// Kept separate from the graph's data fields so the store can borrow the
/// listener list immutably while entities are being mutated.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<(ListenerId, GraphListener)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(&mut self, listener: GraphListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&self, event: &GraphEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscribe_and_notify() {
        let mut registry = ListenerRegistry::default();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&count);
        registry.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(&GraphEvent::Cleared);
        registry.notify(&GraphEvent::VertexAdded {
            id: VertexId::new(1),
        });

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = ListenerRegistry::default();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&count);
        let id = registry.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(registry.len(), 1);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(&GraphEvent::Cleared);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 0);
    }
}
