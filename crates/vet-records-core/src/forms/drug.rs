//! Drug create/edit form.

use super::FormErrors;
use crate::models::{new_record_id, Drug, Route, Species, SpeciesDosage};

/// Raw input of the drug form.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugForm {
    pub name: String,
    pub dosages: Vec<SpeciesDosage>,
    pub routes: Vec<Route>,
}

impl Default for DrugForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            dosages: vec![blank_dosage()],
            routes: Vec::new(),
        }
    }
}

fn blank_dosage() -> SpeciesDosage {
    SpeciesDosage {
        species: Species::Cow,
        dosage: 0.0,
    }
}

impl DrugForm {
    /// Form with one blank dosage row.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(drug: &Drug) -> Self {
        Self {
            name: drug.name.clone(),
            dosages: drug.dosages.clone(),
            routes: drug.routes.clone(),
        }
    }

    pub fn add_dosage(&mut self) {
        self.dosages.push(blank_dosage());
    }

    /// Remove a dosage row. The last remaining row is kept.
    pub fn remove_dosage(&mut self, index: usize) {
        if self.dosages.len() > 1 && index < self.dosages.len() {
            self.dosages.remove(index);
        }
    }

    pub fn toggle_route(&mut self, route: Route) {
        match self.routes.iter().position(|r| *r == route) {
            Some(index) => {
                self.routes.remove(index);
            }
            None => self.routes.push(route),
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Drug name is required");
        }

        if self.dosages.is_empty() {
            errors.add("dosages", "At least one species dosage is required");
        } else if self
            .dosages
            .iter()
            .any(|d| !d.dosage.is_finite() || d.dosage <= 0.0)
        {
            errors.add("dosages", "All dosages must be positive numbers");
        } else if has_duplicate_species(&self.dosages) {
            errors.add("dosages", "Each species can only have one dosage");
        }

        if self.routes.is_empty() {
            errors.add("routes", "At least one administration route is required");
        }

        errors
    }

    /// Build the record to save, keeping the id of `existing`.
    pub fn build(&self, existing: Option<&Drug>) -> Result<Drug, FormErrors> {
        self.validate().into_result()?;

        Ok(Drug {
            id: existing.map(|d| d.id.clone()).unwrap_or_else(new_record_id),
            name: self.name.trim().to_string(),
            dosages: self.dosages.clone(),
            routes: self.routes.clone(),
        })
    }
}

fn has_duplicate_species(dosages: &[SpeciesDosage]) -> bool {
    dosages
        .iter()
        .enumerate()
        .any(|(i, d)| dosages[..i].iter().any(|earlier| earlier.species == d.species))
}
