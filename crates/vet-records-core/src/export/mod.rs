//! Export functionality: backup files and printable prescriptions.

mod backup;
mod prescription_sheet;

pub use backup::*;
pub use prescription_sheet::*;
