//! # roster-store
//!
//! Student records in a schemaless document collection, with live queries.
//!
//! ## Principles
//!
//! - **The collection is the only state** - clients never cache records
//! - **Pushes carry full snapshots** - listeners replace, never merge
//! - **Mutation by content is two-phase** - lookup ids, then mutate each id
//! - **Partial failure is visible** - per-document outcomes, no rollback
//!
//! ## Architecture
//!
//! ```text
//! WRITE:
//!   RecordStoreClient → DocumentCollection → SQLite commit → LiveHub push
//!
//! READ:
//!   LiveQuery ← full snapshot ← LiveHub
//! ```
//!
//! ## Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use roster_store::{RecordStoreClient, SnapshotEvent, SqliteCollection, Student};
//!
//! let collection = SqliteCollection::in_memory("students").await.unwrap();
//! let client = RecordStoreClient::new(collection);
//!
//! let mut live = client.listen().await;
//! client.create(Student::new("Ana", 20)).await.unwrap();
//!
//! let _initial = live.try_next();
//! match live.try_next() {
//!     Some(SnapshotEvent::Snapshot(snapshot)) => assert_eq!(snapshot.len(), 1),
//!     other => panic!("unexpected event: {other:?}"),
//! }
//! live.stop();
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`client`] - Record store client (create, find, update/delete by content)
//! - [`collection`] - The document collection seam
//! - [`backend`] - SQLite-backed collection
//! - [`live`] - Live queries and listener registrations
//! - [`instrumented`] - Call-counting, fault-injecting wrapper for tests
//! - [`types`] - Core types

pub mod backend;
pub mod client;
pub mod collection;
mod executor;
pub mod instrumented;
pub mod live;
mod sqlite;
pub mod types;

#[cfg(test)]
mod tests;

pub use backend::SqliteCollection;
pub use client::{DocumentOutcome, Matches, MutationKind, MutationReport, RecordStoreClient};
pub use collection::DocumentCollection;
pub use executor::AsyncStore;
pub use instrumented::{CallCounts, InstrumentedCollection};
pub use live::{ListenerRegistration, LiveHub, LiveQuery, SnapshotEvent};
pub use types::{Document, DocumentId, Filter, Query, QuerySnapshot, Student};

/// Errors from the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The executor thread or database could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// No document with this id exists in the collection.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Failure reported by a non-SQLite backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// A live query push that reported a fault instead of data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listen failed: {message}")]
pub struct ListenError {
    message: String,
}

impl ListenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
