//! SQLite-backed document collection.
//!
//! # Write path (strict order)
//!
//! 1. Commit the change on the executor thread
//! 2. Re-read the full collection
//! 3. Push the snapshot to every live query
//!
//! If step 1 fails nothing is pushed and the error is returned. If step 2
//! fails the write still succeeded; live queries receive
//! [`SnapshotEvent::Error`] instead of data.
//!
//! Steps 2 and 3 run under one lock shared by every clone, and reads are
//! FIFO on the executor thread, so pushes leave in commit order: a listener
//! never sees an older snapshot after a newer one.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::collection::DocumentCollection;
use crate::executor::AsyncStore;
use crate::live::{LiveHub, LiveQuery, SnapshotEvent};
use crate::sqlite;
use crate::types::{Document, DocumentId, Query, QuerySnapshot, Student};
use crate::{ListenError, StoreError, StoreResult};

/// A named collection in a SQLite document store.
///
/// Cloning is cheap; clones share the executor thread and the live hub, so
/// every clone sees every other clone's writes.
#[derive(Clone)]
pub struct SqliteCollection {
    store: AsyncStore,
    hub: Arc<LiveHub>,
    publish_lock: Arc<Mutex<()>>,
    name: String,
}

impl SqliteCollection {
    /// Wraps an open store.
    pub fn new(store: AsyncStore, name: impl Into<String>) -> Self {
        Self {
            store,
            hub: Arc::new(LiveHub::new()),
            publish_lock: Arc::new(Mutex::new(())),
            name: name.into(),
        }
    }

    /// Opens the collection `name` in the database at `path`.
    pub async fn open(path: &Path, name: impl Into<String>) -> StoreResult<Self> {
        let store = AsyncStore::open(path).await?;
        Ok(Self::new(store, name))
    }

    /// Opens the collection `name` in a fresh in-memory database.
    pub async fn in_memory(name: impl Into<String>) -> StoreResult<Self> {
        let store = AsyncStore::open_in_memory().await?;
        Ok(Self::new(store, name))
    }

    /// The live hub shared by all clones.
    pub fn hub(&self) -> &Arc<LiveHub> {
        &self.hub
    }

    /// Reads the full collection.
    pub async fn snapshot(&self) -> StoreResult<QuerySnapshot> {
        let documents = self.get(Query::all()).await?;
        Ok(QuerySnapshot::new(documents))
    }

    /// Pushes the current full collection to every live query.
    pub async fn publish_current(&self) {
        let _guard = self.publish_lock.lock().await;
        let event = self.snapshot_event().await;
        self.hub.publish(&self.name, event);
    }

    async fn snapshot_event(&self) -> SnapshotEvent {
        match self.snapshot().await {
            Ok(snapshot) => SnapshotEvent::Snapshot(snapshot),
            Err(e) => {
                warn!(collection = %self.name, error = %e, "failed to read collection for live push");
                SnapshotEvent::Error(ListenError::new(e.to_string()))
            }
        }
    }

    /// Watches for commits made through other connections (e.g. another
    /// process) and pushes a fresh snapshot when one is seen.
    ///
    /// Writes through this collection never trip the poller; they publish
    /// directly. The task runs until aborted.
    pub fn spawn_change_poller(&self, every: Duration) -> JoinHandle<()> {
        let collection = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            let mut last_seen: Option<i64> = None;

            loop {
                ticker.tick().await;

                match collection.store.call_sqlite(|conn| sqlite::data_version(conn)).await {
                    Ok(version) => {
                        if last_seen.is_some_and(|seen| seen != version) {
                            debug!(collection = %collection.name, version, "external change detected");
                            collection.publish_current().await;
                        }
                        last_seen = Some(version);
                    }
                    Err(e) => {
                        warn!(collection = %collection.name, error = %e, "change poll failed");
                        collection.hub.publish(
                            &collection.name,
                            SnapshotEvent::Error(ListenError::new(e.to_string())),
                        );
                    }
                }
            }
        })
    }
}

#[async_trait]
impl DocumentCollection for SqliteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, student: Student) -> StoreResult<DocumentId> {
        let name = self.name.clone();
        let id = self
            .store
            .call_sqlite(move |conn| sqlite::insert_document(conn, &name, &student))
            .await?;

        self.publish_current().await;
        Ok(id)
    }

    async fn get(&self, query: Query) -> StoreResult<Vec<Document>> {
        let name = self.name.clone();
        self.store
            .call_sqlite(move |conn| sqlite::query_documents(conn, &name, &query))
            .await
    }

    async fn delete(&self, id: &DocumentId) -> StoreResult<()> {
        let name = self.name.clone();
        let target = id.clone();
        let deleted = self
            .store
            .call_sqlite(move |conn| sqlite::delete_document(conn, &name, &target))
            .await?;

        if deleted {
            self.publish_current().await;
        }
        Ok(())
    }

    async fn update_age(&self, id: &DocumentId, age: i32) -> StoreResult<()> {
        let name = self.name.clone();
        let target = id.clone();
        self.store
            .call(move |conn| {
                if sqlite::update_document_age(conn, &name, &target, age)? {
                    Ok(())
                } else {
                    Err(StoreError::DocumentNotFound(target))
                }
            })
            .await?;

        self.publish_current().await;
        Ok(())
    }

    async fn listen(&self) -> LiveQuery {
        let _guard = self.publish_lock.lock().await;
        let query = self.hub.register(&self.name);
        let event = self.snapshot_event().await;
        if let Some(listener_id) = query.registration().listener_id() {
            self.hub.publish_to(&self.name, listener_id, event);
        }
        query
    }
}
