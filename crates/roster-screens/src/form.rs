//! Name/age form state and age validation.

use tracing::warn;

/// Input that never reached the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid age input: {0:?}")]
    InvalidAge(String),
}

/// Parses age text as an `i32`. An optional leading sign is accepted;
/// whitespace is not trimmed.
pub fn parse_age(raw: &str) -> Result<i32, ValidationError> {
    raw.parse::<i32>().map_err(|_| {
        warn!(input = raw, "invalid age input");
        ValidationError::InvalidAge(raw.to_string())
    })
}

/// Keeps only ASCII digits from typed text.
pub fn accept_age_keystrokes(typed: &str) -> String {
    typed.chars().filter(char::is_ascii_digit).collect()
}

/// The two text fields of the students screen. Both start empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    name: String,
    age: String,
}

impl StudentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age_text(&self) -> &str {
        &self.age
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the age text as-is (e.g. a paste). Validated on submit.
    pub fn set_age_text(&mut self, age: impl Into<String>) {
        self.age = age.into();
    }

    /// Appends typed characters, dropping anything that is not a digit.
    pub fn type_age(&mut self, typed: &str) {
        self.age.push_str(&accept_age_keystrokes(typed));
    }

    pub fn age(&self) -> Result<i32, ValidationError> {
        parse_age(&self.age)
    }
}
