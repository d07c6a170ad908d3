//! Create/edit form state and validation.
//!
//! Forms hold raw user input. `validate` reports every invalid field at once
//! (one message per field, the first rule that fails), and `build` turns a
//! valid form into a record ready to save.

mod drug;
mod test_procedure;
mod vaccination;
mod vaccine_type;

pub use drug::*;
pub use test_procedure::*;
pub use vaccination::*;
pub use vaccine_type::*;

use thiserror::Error;

/// Field-level validation messages, in the order fields were checked.
#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("{} invalid field(s): {}", .errors.len(), self.summary())]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. A field keeps its first message.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok` when there are no errors.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(f, m)| format!("{}: {}", f, m))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Which form, if any, a view currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(String),
}

impl FormMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormMode::Closed)
    }

    /// Id of the record being edited.
    pub fn editing_id(&self) -> Option<&str> {
        match self {
            FormMode::Edit(id) => Some(id),
            _ => None,
        }
    }
}

/// Parse a numeric text input. Blank or non-finite input is `None`.
pub(crate) fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
