//! Record store client: CRUD by content over a [`DocumentCollection`].
//!
//! The collection addresses documents by opaque id only, so update and
//! delete "by content" run in two phases:
//!
//! 1. **lookup**: an equality query returning the matching ids in order
//! 2. **mutation**: one independent call per id
//!
//! Every match is mutated, duplicates included. A failure on one document
//! neither stops the remaining ones nor rolls back earlier successes; the
//! [`MutationReport`] records each outcome.

use tracing::{debug, warn};

use crate::collection::DocumentCollection;
use crate::live::LiveQuery;
use crate::types::{DocumentId, Query, Student};
use crate::{StoreError, StoreResult};

/// Ordered ids found by the lookup phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matches {
    ids: Vec<DocumentId>,
}

impl Matches {
    pub fn new(ids: Vec<DocumentId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Which mutation a report describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Delete,
    UpdateAge,
}

/// Result of mutating one matched document.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub id: DocumentId,
    pub result: StoreResult<()>,
}

/// Per-document outcomes of a mutation phase, in lookup order.
#[derive(Debug)]
pub struct MutationReport {
    kind: MutationKind,
    outcomes: Vec<DocumentOutcome>,
}

impl MutationReport {
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn outcomes(&self) -> &[DocumentOutcome] {
        &self.outcomes
    }

    /// Number of documents matched by the lookup phase.
    pub fn matched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.matched() - self.succeeded()
    }

    /// Failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = (&DocumentId, &StoreError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.id, e)))
    }
}

/// Client for the student collection.
#[derive(Clone, Debug)]
pub struct RecordStoreClient<C> {
    collection: C,
}

impl<C: DocumentCollection> RecordStoreClient<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Inserts a new record with exactly the two given fields.
    pub async fn create(&self, student: Student) -> StoreResult<DocumentId> {
        match self.collection.add(student).await {
            Ok(id) => {
                debug!(collection = self.collection.name(), document_id = %id, "document added");
                Ok(id)
            }
            Err(e) => {
                warn!(collection = self.collection.name(), error = %e, "error adding document");
                Err(e)
            }
        }
    }

    /// Records whose name and age both equal the given values.
    pub async fn find_by_name_and_age(&self, name: &str, age: i32) -> StoreResult<Vec<Student>> {
        let documents = self
            .collection
            .get(Query::all().where_name(name).where_age(age))
            .await?;
        Ok(documents.into_iter().map(|d| d.data).collect())
    }

    /// Records whose name equals `name`.
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Student>> {
        let documents = self.collection.get(Query::all().where_name(name)).await?;
        Ok(documents.into_iter().map(|d| d.data).collect())
    }

    /// Lookup phase for delete: ids of records matching both fields.
    pub async fn lookup_by_name_and_age(&self, name: &str, age: i32) -> StoreResult<Matches> {
        self.lookup(Query::all().where_name(name).where_age(age))
            .await
    }

    /// Lookup phase for update: ids of records matching `name`.
    pub async fn lookup_by_name(&self, name: &str) -> StoreResult<Matches> {
        self.lookup(Query::all().where_name(name)).await
    }

    async fn lookup(&self, query: Query) -> StoreResult<Matches> {
        match self.collection.get(query).await {
            Ok(documents) => Ok(Matches::new(documents.into_iter().map(|d| d.id).collect())),
            Err(e) => {
                warn!(collection = self.collection.name(), error = %e, "error getting documents");
                Err(e)
            }
        }
    }

    /// Mutation phase for delete: one delete per matched id.
    pub async fn delete_matches(&self, matches: &Matches) -> MutationReport {
        let mut outcomes = Vec::with_capacity(matches.len());
        for id in matches.ids() {
            let result = self.collection.delete(id).await;
            match &result {
                Ok(()) => debug!(document_id = %id, "document deleted"),
                Err(e) => warn!(document_id = %id, error = %e, "error deleting document"),
            }
            outcomes.push(DocumentOutcome {
                id: id.clone(),
                result,
            });
        }
        MutationReport {
            kind: MutationKind::Delete,
            outcomes,
        }
    }

    /// Mutation phase for update: sets `age` on each matched id.
    pub async fn update_age_of_matches(&self, matches: &Matches, age: i32) -> MutationReport {
        let mut outcomes = Vec::with_capacity(matches.len());
        for id in matches.ids() {
            let result = self.collection.update_age(id, age).await;
            match &result {
                Ok(()) => debug!(document_id = %id, age, "document updated"),
                Err(e) => warn!(document_id = %id, error = %e, "error updating document"),
            }
            outcomes.push(DocumentOutcome {
                id: id.clone(),
                result,
            });
        }
        MutationReport {
            kind: MutationKind::UpdateAge,
            outcomes,
        }
    }

    /// Deletes every record matching both `name` and `age`.
    ///
    /// `Err` means the lookup failed and nothing was touched.
    pub async fn delete_matching(&self, name: &str, age: i32) -> StoreResult<MutationReport> {
        let matches = self.lookup_by_name_and_age(name, age).await?;
        Ok(self.delete_matches(&matches).await)
    }

    /// Sets `age` to `new_age` on every record named `name`.
    ///
    /// `Err` means the lookup failed and nothing was touched.
    pub async fn update_age_matching(
        &self,
        name: &str,
        new_age: i32,
    ) -> StoreResult<MutationReport> {
        let matches = self.lookup_by_name(name).await?;
        Ok(self.update_age_of_matches(&matches, new_age).await)
    }

    /// Starts a live query over the whole collection.
    pub async fn listen(&self) -> LiveQuery {
        self.collection.listen().await
    }
}
