//! The document collection seam.
//!
//! [`DocumentCollection`] is everything the record client needs from a
//! backend: insert, equality query, delete/update by opaque id, and a live
//! query over the whole collection. Documents are addressed by id only;
//! content-addressed mutation is built on top in [`crate::client`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::live::LiveQuery;
use crate::types::{Document, DocumentId, Query, Student};
use crate::StoreResult;

/// A remote, schemaless collection of student documents.
///
/// Every operation is independently fallible. Implementations must be
/// shareable between clients: a write by one client is pushed to live
/// queries opened by any other client of the same collection.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Collection name.
    fn name(&self) -> &str;

    /// Inserts a document holding exactly `student`'s fields.
    async fn add(&self, student: Student) -> StoreResult<DocumentId>;

    /// Returns documents matching every filter, in insertion order.
    async fn get(&self, query: Query) -> StoreResult<Vec<Document>>;

    /// Deletes a document. Deleting an id that no longer exists succeeds.
    async fn delete(&self, id: &DocumentId) -> StoreResult<()>;

    /// Sets the `age` field. Fails with `DocumentNotFound` for unknown ids.
    async fn update_age(&self, id: &DocumentId, age: i32) -> StoreResult<()>;

    /// Starts a live query on the full collection.
    ///
    /// The current result set is pushed immediately, then again after every
    /// committed change.
    async fn listen(&self) -> LiveQuery;
}

#[async_trait]
impl<T: DocumentCollection + ?Sized> DocumentCollection for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn add(&self, student: Student) -> StoreResult<DocumentId> {
        (**self).add(student).await
    }

    async fn get(&self, query: Query) -> StoreResult<Vec<Document>> {
        (**self).get(query).await
    }

    async fn delete(&self, id: &DocumentId) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn update_age(&self, id: &DocumentId, age: i32) -> StoreResult<()> {
        (**self).update_age(id, age).await
    }

    async fn listen(&self) -> LiveQuery {
        (**self).listen().await
    }
}
