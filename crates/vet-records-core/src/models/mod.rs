//! Domain models for the vet-records system.

mod drug;
mod prescription;
mod species;
mod test_procedure;
mod theme;
mod vaccination;
mod vaccine_type;

pub use drug::*;
pub use prescription::*;
pub use species::*;
pub use test_procedure::*;
pub use theme::*;
pub use vaccination::*;
pub use vaccine_type::*;

/// Generate a fresh record id.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
