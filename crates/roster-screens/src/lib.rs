//! Screen controllers for the roster app.
//!
//! Each screen is a single-owner state holder driven from one task. The
//! front end feeds it user input, awaits its handlers, and renders what it
//! exposes; the screen never draws anything itself.
//!
//! - [`StudentsScreen`] - form, CRUD buttons and the live student list
//! - [`UploadScreen`] - pick one image, upload it, display its reference

mod form;
mod list;
mod students_screen;
mod upload_screen;

pub use form::{accept_age_keystrokes, parse_age, StudentForm, ValidationError};
pub use list::{render, ListChange, StudentCard, StudentList};
pub use students_screen::{ActionOutcome, StudentsScreen};
pub use upload_screen::{PickOutcome, UploadScreen, UploadState};
