//! The students screen: a form, three buttons and the live list.
//!
//! Button handlers validate the age before touching the store. Backend
//! failures are logged by the store client and returned as an
//! [`ActionOutcome`], but nothing on this screen displays them. The list is
//! driven solely by live pushes, applied when the owner pumps them.

use roster_store::{
    DocumentCollection, DocumentId, LiveQuery, MutationReport, RecordStoreClient, StoreError,
};
use tracing::{debug, info};

use crate::form::{StudentForm, ValidationError};
use crate::list::{render, ListChange, StudentCard, StudentList};

/// Result of pressing one of the screen's buttons.
#[derive(Debug)]
pub enum ActionOutcome {
    /// Age did not parse; the store was not called.
    Rejected(ValidationError),
    Created(DocumentId),
    Mutated(MutationReport),
    /// The store call (or the lookup phase) failed.
    Failed(StoreError),
}

pub struct StudentsScreen<C> {
    client: RecordStoreClient<C>,
    form: StudentForm,
    list: StudentList,
    live: Option<LiveQuery>,
    closed: bool,
}

impl<C> StudentsScreen<C> {
    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut StudentForm {
        &mut self.form
    }

    pub fn list(&self) -> &StudentList {
        &self.list
    }

    pub fn cards(&self) -> Vec<StudentCard> {
        render(self.list.students())
    }

    pub fn is_listening(&self) -> bool {
        self.live.as_ref().is_some_and(LiveQuery::is_active)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the live query. Later calls do nothing, and a screen that
    /// never started has nothing to release.
    pub fn close(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.stop();
            debug!("students screen stopped listening");
        }
        self.closed = true;
    }

    /// Applies every push already queued, in order.
    pub fn pump(&mut self) -> usize {
        let Some(live) = self.live.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(event) = live.try_next() {
            self.list.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for one push and applies it. `None` once the screen is closed.
    pub async fn next_event(&mut self) -> Option<ListChange> {
        let event = self.live.as_mut()?.next().await?;
        Some(self.list.apply(event))
    }
}

impl<C: DocumentCollection> StudentsScreen<C> {
    pub fn new(client: RecordStoreClient<C>) -> Self {
        Self {
            client,
            form: StudentForm::new(),
            list: StudentList::new(),
            live: None,
            closed: false,
        }
    }

    pub fn client(&self) -> &RecordStoreClient<C> {
        &self.client
    }

    /// Starts the live query. Only the first call on an open screen
    /// registers a listener.
    pub async fn start(&mut self) {
        if self.live.is_some() || self.closed {
            return;
        }
        self.live = Some(self.client.listen().await);
        info!(collection = self.client.collection().name(), "students screen listening");
    }

    /// "Add User".
    pub async fn on_add(&mut self) -> ActionOutcome {
        let age = match self.form.age() {
            Ok(age) => age,
            Err(e) => return ActionOutcome::Rejected(e),
        };
        let student = roster_store::Student::new(self.form.name(), age);
        match self.client.create(student).await {
            Ok(id) => ActionOutcome::Created(id),
            Err(e) => ActionOutcome::Failed(e),
        }
    }

    /// "Delete User": removes every record matching both fields.
    pub async fn on_delete(&mut self) -> ActionOutcome {
        let age = match self.form.age() {
            Ok(age) => age,
            Err(e) => return ActionOutcome::Rejected(e),
        };
        match self.client.delete_matching(self.form.name(), age).await {
            Ok(report) => ActionOutcome::Mutated(report),
            Err(e) => ActionOutcome::Failed(e),
        }
    }

    /// "Update User": sets the typed age on every record with the typed
    /// name.
    pub async fn on_update(&mut self) -> ActionOutcome {
        let age = match self.form.age() {
            Ok(age) => age,
            Err(e) => return ActionOutcome::Rejected(e),
        };
        match self.client.update_age_matching(self.form.name(), age).await {
            Ok(report) => ActionOutcome::Mutated(report),
            Err(e) => ActionOutcome::Failed(e),
        }
    }
}

impl<C> Drop for StudentsScreen<C> {
    fn drop(&mut self) {
        self.close();
    }
}
