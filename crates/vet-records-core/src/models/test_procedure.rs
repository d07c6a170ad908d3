//! Diagnostic test procedures.

use serde::{Deserialize, Serialize};

use super::Species;

/// Age range in years the procedure applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl AgeRange {
    /// Whether an age falls inside the range (inclusive).
    pub fn contains(&self, age: f64) -> bool {
        age >= self.min && age <= self.max
    }
}

/// A diagnostic test procedure with ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestProcedure {
    pub id: String,
    pub name: String,
    /// Steps in procedure order
    pub steps: Vec<String>,
    pub target_animals: Vec<Species>,
    pub age_range: AgeRange,
}

impl TestProcedure {
    /// Whether the procedure applies to an animal of this species and age.
    pub fn applies_to(&self, species: Species, age: f64) -> bool {
        self.target_animals.contains(&species) && self.age_range.contains(age)
    }
}
