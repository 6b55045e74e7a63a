//! The displayed student list and its rendering.

use std::fmt;

use roster_store::{SnapshotEvent, Student};
use tracing::{debug, warn};

/// What applying a push did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Replaced,
    Unchanged,
}

/// Last good full snapshot of the collection.
///
/// Only [`SnapshotEvent::Snapshot`] writes to it, and always as a whole
/// replacement, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentList {
    students: Vec<Student>,
}

impl StudentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: SnapshotEvent) -> ListChange {
        match event {
            SnapshotEvent::Snapshot(snapshot) => {
                self.students = snapshot.students();
                debug!(count = self.students.len(), "student list replaced");
                ListChange::Replaced
            }
            SnapshotEvent::Missing => {
                debug!("current data: null");
                ListChange::Unchanged
            }
            SnapshotEvent::Error(e) => {
                warn!(error = %e, "listen failed");
                ListChange::Unchanged
            }
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentCard {
    pub name_line: String,
    pub age_line: String,
}

impl fmt::Display for StudentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.name_line, self.age_line)
    }
}

/// One card per student, in list order.
pub fn render(students: &[Student]) -> Vec<StudentCard> {
    students
        .iter()
        .map(|s| StudentCard {
            name_line: format!("Name: {}", s.name),
            age_line: format!("Age: {}", s.age),
        })
        .collect()
}
