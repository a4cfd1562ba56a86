//! State-change notifications published by the facade.
//!
//! Collaborators observe engine state changes only through this channel.
//! Handlers are registered on the facade and invoked synchronously after
//! the underlying operation succeeds; engine internals never depend on
//! subscriber behavior.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// A lifecycle or mutation event published by the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbEvent {
    /// Engine brought into service
    Initialized,
    /// Engine taken out of service
    Closed,
    /// A record was inserted
    RecordInserted {
        /// The inserted record's identifier
        id: String,
    },
    /// A record was updated
    RecordUpdated {
        /// The updated record's identifier
        id: String,
    },
    /// A record was deleted
    RecordDeleted {
        /// The deleted record's identifier
        id: String,
    },
    /// A secondary index was created
    IndexCreated {
        /// The indexed metadata field
        field: String,
    },
    /// A secondary index was dropped
    IndexDropped {
        /// The formerly indexed metadata field
        field: String,
    },
    /// A maintenance pass completed
    Optimized,
}

impl DbEvent {
    /// Event name for logs and wire encodings.
    pub fn name(&self) -> &'static str {
        match self {
            DbEvent::Initialized => "initialized",
            DbEvent::Closed => "closed",
            DbEvent::RecordInserted { .. } => "record.inserted",
            DbEvent::RecordUpdated { .. } => "record.updated",
            DbEvent::RecordDeleted { .. } => "record.deleted",
            DbEvent::IndexCreated { .. } => "index.created",
            DbEvent::IndexDropped { .. } => "index.dropped",
            DbEvent::Optimized => "optimized",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventHandler = Box<dyn Fn(&DbEvent) + Send + Sync>;

/// Subscription registry owned by the facade.
#[derive(Default)]
pub(crate) struct EventRegistry {
    handlers: RwLock<Vec<(SubscriptionId, EventHandler)>>,
    next_id: AtomicU64,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        EventRegistry::default()
    }

    pub(crate) fn subscribe(
        &self,
        handler: impl Fn(&DbEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handlers.write().push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `true` if it was registered.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub(crate) fn emit(&self, event: &DbEvent) {
        for (_, handler) in self.handlers.read().iter() {
            handler(event);
        }
    }
}
