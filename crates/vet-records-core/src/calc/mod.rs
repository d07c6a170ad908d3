//! Domain calculators: drug dosage and vaccination dose schedules.

mod dosage;
mod schedule;

pub use dosage::*;
pub use schedule::*;
