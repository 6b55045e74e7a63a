//! Live queries over a whole collection.
//!
//! A live query receives the *complete* result set whenever the collection
//! changes, never a diff. Events travel over an unbounded channel owned by
//! the listener, so they are applied on the listener's own task and a slow
//! listener never blocks a writer.
//!
//! # Lifecycle
//!
//! - [`LiveHub::register`] hands back a [`LiveQuery`] holding a
//!   [`ListenerRegistration`]
//! - `stop()`/`remove()` unregister; calling them again is a no-op
//! - dropping the registration unregisters as well

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::types::QuerySnapshot;
use crate::ListenError;

/// One push delivered to a live query.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotEvent {
    /// The full current result set. May be empty.
    Snapshot(QuerySnapshot),
    /// The backend reported no snapshot at all (not the same as empty).
    Missing,
    /// The push itself failed; no data accompanies it.
    Error(ListenError),
}

#[derive(Debug)]
struct Listener {
    id: u64,
    sender: UnboundedSender<SnapshotEvent>,
}

/// Registry of live queries, keyed by collection name.
#[derive(Debug, Default)]
pub struct LiveHub {
    next_id: AtomicU64,
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener on `collection`.
    ///
    /// Only events published after this call are received; callers that
    /// want the current state push it themselves (see
    /// [`crate::SqliteCollection`]).
    pub fn register(self: &Arc<Self>, collection: &str) -> LiveQuery {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.listeners
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(Listener { id, sender });
        debug!(collection, listener_id = id, "live query registered");

        LiveQuery {
            registration: ListenerRegistration {
                hub: Arc::downgrade(self),
                collection: collection.to_string(),
                id: Some(id),
            },
            receiver,
        }
    }

    /// Sends an event to every listener of `collection`.
    ///
    /// Listeners whose receiving side is gone are dropped here.
    pub fn publish(&self, collection: &str, event: SnapshotEvent) {
        let mut listeners = self.listeners.write();
        if let Some(entries) = listeners.get_mut(collection) {
            entries.retain(|listener| listener.sender.send(event.clone()).is_ok());
            if entries.is_empty() {
                listeners.remove(collection);
            }
        }
    }

    /// Sends an event to a single listener.
    pub(crate) fn publish_to(&self, collection: &str, listener_id: u64, event: SnapshotEvent) {
        let listeners = self.listeners.read();
        if let Some(listener) = listeners
            .get(collection)
            .and_then(|entries| entries.iter().find(|l| l.id == listener_id))
        {
            let _ = listener.sender.send(event);
        }
    }

    /// Number of registered listeners on `collection`.
    pub fn listener_count(&self, collection: &str) -> usize {
        self.listeners
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn unregister(&self, collection: &str, id: u64) {
        let mut listeners = self.listeners.write();
        if let Some(entries) = listeners.get_mut(collection) {
            entries.retain(|listener| listener.id != id);
            if entries.is_empty() {
                listeners.remove(collection);
            }
        }
        debug!(collection, listener_id = id, "live query removed");
    }
}

/// Handle for one registered listener.
///
/// Removing is idempotent; a default (never registered) handle removes
/// nothing. Dropping the handle removes it.
#[derive(Debug, Default)]
pub struct ListenerRegistration {
    hub: Weak<LiveHub>,
    collection: String,
    id: Option<u64>,
}

impl ListenerRegistration {
    /// Unregisters the listener. Safe to call any number of times.
    pub fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(hub) = self.hub.upgrade() {
                hub.unregister(&self.collection, id);
            }
        }
    }

    /// True until the first `remove()`.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn listener_id(&self) -> Option<u64> {
        self.id
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}

/// A running live query: its registration plus the event stream.
#[derive(Debug)]
pub struct LiveQuery {
    registration: ListenerRegistration,
    receiver: UnboundedReceiver<SnapshotEvent>,
}

impl LiveQuery {
    /// Waits for the next event.
    ///
    /// Returns `None` once the query is stopped or the collection is gone.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        if !self.registration.is_active() {
            return None;
        }
        self.receiver.recv().await
    }

    /// Returns a pending event without waiting.
    pub fn try_next(&mut self) -> Option<SnapshotEvent> {
        if !self.registration.is_active() {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Stops the query. Idempotent; no events are yielded afterwards.
    pub fn stop(&mut self) {
        self.registration.remove();
        self.receiver.close();
    }

    pub fn is_active(&self) -> bool {
        self.registration.is_active()
    }

    pub fn registration(&self) -> &ListenerRegistration {
        &self.registration
    }
}
