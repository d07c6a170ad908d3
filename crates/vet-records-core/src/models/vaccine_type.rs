//! Vaccine-type catalog entries.

use serde::{Deserialize, Serialize};

use super::Species;

/// A reusable vaccine template: dose count, interval and target species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaccineType {
    pub id: String,
    pub name: String,
    pub total_doses: u32,
    /// Days between doses; zero for single-dose vaccines
    pub days_interval: u32,
    pub target_animals: Vec<Species>,
}

impl VaccineType {
    /// Whether the vaccine is intended for a species.
    pub fn targets(&self, species: Species) -> bool {
        self.target_animals.contains(&species)
    }
}
