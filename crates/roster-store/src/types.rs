//! Core types for the record store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque store-assigned document identifier (UUID string).
///
/// Never shown to users; records are addressed by content and this id is
/// only used between the lookup and mutation phases.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Creates a new random document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a document ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the document ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A student record: the whole document body.
///
/// No uniqueness constraint applies; several documents may hold the same
/// `(name, age)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
}

impl Student {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// A stored document: identifier plus body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub data: Student,
}

/// A single equality filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    NameEq(String),
    AgeEq(i32),
}

impl Filter {
    fn matches(&self, student: &Student) -> bool {
        match self {
            Filter::NameEq(name) => &student.name == name,
            Filter::AgeEq(age) => student.age == *age,
        }
    }
}

/// A conjunction of equality filters over one collection.
///
/// An empty query matches every document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<Filter>,
}

impl Query {
    /// Query matching every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds `name == value`.
    pub fn where_name(mut self, name: impl Into<String>) -> Self {
        self.filters.push(Filter::NameEq(name.into()));
        self
    }

    /// Adds `age == value`.
    pub fn where_age(mut self, age: i32) -> Self {
        self.filters.push(Filter::AgeEq(age));
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns true when every filter accepts the student.
    pub fn matches(&self, student: &Student) -> bool {
        self.filters.iter().all(|f| f.matches(student))
    }
}

/// The complete result set of a live query at one point in time.
///
/// Always the full collection, never a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    documents: Vec<Document>,
}

impl QuerySnapshot {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Document bodies in snapshot order.
    pub fn students(&self) -> Vec<Student> {
        self.documents.iter().map(|d| d.data.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
