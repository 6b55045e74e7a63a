//! A collection wrapper that counts calls and injects failures.
//!
//! Wraps any [`DocumentCollection`]. Used by tests to assert how many
//! backend calls an operation made and to force per-document failures in
//! the mutation phase.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::collection::DocumentCollection;
use crate::live::LiveQuery;
use crate::types::{Document, DocumentId, Query, Student};
use crate::{StoreError, StoreResult};

/// Per-operation call counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub add: usize,
    pub get: usize,
    pub delete: usize,
    pub update_age: usize,
    pub listen: usize,
}

impl CallCounts {
    /// Calls that reach the backend's data (everything but `listen`).
    pub fn data_calls(&self) -> usize {
        self.add + self.get + self.delete + self.update_age
    }
}

/// Counting, fault-injecting wrapper around a collection.
#[derive(Debug)]
pub struct InstrumentedCollection<C> {
    inner: C,
    add: AtomicUsize,
    get: AtomicUsize,
    delete: AtomicUsize,
    update_age: AtomicUsize,
    listen: AtomicUsize,
    fail_adds: AtomicBool,
    fail_lookups: AtomicBool,
    failing_ids: Mutex<HashSet<DocumentId>>,
}

impl<C> InstrumentedCollection<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            add: AtomicUsize::new(0),
            get: AtomicUsize::new(0),
            delete: AtomicUsize::new(0),
            update_age: AtomicUsize::new(0),
            listen: AtomicUsize::new(0),
            fail_adds: AtomicBool::new(false),
            fail_lookups: AtomicBool::new(false),
            failing_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            add: self.add.load(Ordering::SeqCst),
            get: self.get.load(Ordering::SeqCst),
            delete: self.delete.load(Ordering::SeqCst),
            update_age: self.update_age.load(Ordering::SeqCst),
            listen: self.listen.load(Ordering::SeqCst),
        }
    }

    /// Makes every `add` fail.
    pub fn fail_adds(&self, fail: bool) {
        self.fail_adds.store(fail, Ordering::SeqCst);
    }

    /// Makes every `get` fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes `delete` and `update_age` fail for this id.
    pub fn fail_document(&self, id: DocumentId) {
        self.failing_ids.lock().insert(id);
    }

    fn injected(&self, id: &DocumentId) -> StoreResult<()> {
        if self.failing_ids.lock().contains(id) {
            return Err(StoreError::Backend(format!("injected failure for {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl<C: DocumentCollection> DocumentCollection for InstrumentedCollection<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn add(&self, student: Student) -> StoreResult<DocumentId> {
        self.add.fetch_add(1, Ordering::SeqCst);
        if self.fail_adds.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected add failure".to_string()));
        }
        self.inner.add(student).await
    }

    async fn get(&self, query: Query) -> StoreResult<Vec<Document>> {
        self.get.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected lookup failure".to_string()));
        }
        self.inner.get(query).await
    }

    async fn delete(&self, id: &DocumentId) -> StoreResult<()> {
        self.delete.fetch_add(1, Ordering::SeqCst);
        self.injected(id)?;
        self.inner.delete(id).await
    }

    async fn update_age(&self, id: &DocumentId, age: i32) -> StoreResult<()> {
        self.update_age.fetch_add(1, Ordering::SeqCst);
        self.injected(id)?;
        self.inner.update_age(id, age).await
    }

    async fn listen(&self) -> LiveQuery {
        self.listen.fetch_add(1, Ordering::SeqCst);
        self.inner.listen().await
    }
}
