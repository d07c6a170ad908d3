//! Case-insensitive list filtering for the record views.

use crate::models::{Drug, Prescription, Species, TestProcedure, Vaccination, VaccineType};

/// A record that can be matched against a free-text search term.
pub trait Searchable {
    /// Text fields the search looks at.
    fn search_fields(&self) -> Vec<String>;

    /// Whether any field contains `term`, ignoring case.
    ///
    /// A blank term matches everything.
    fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Searchable for Vaccination {
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.animal_id.clone(),
            self.vaccine_type.clone(),
            self.species.to_string(),
            self.age.to_string(),
        ]
    }
}

impl Searchable for TestProcedure {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        fields.extend(self.target_animals.iter().map(|s| s.to_string()));
        fields.extend(self.steps.iter().cloned());
        fields
    }
}

impl Searchable for Drug {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        fields.extend(self.dosages.iter().map(|d| d.species.to_string()));
        fields.extend(self.routes.iter().map(|r| r.to_string()));
        fields
    }
}

impl Searchable for Prescription {
    fn search_fields(&self) -> Vec<String> {
        vec![self.animal_id.clone(), self.species.to_string()]
    }
}

impl Searchable for VaccineType {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        fields.extend(self.target_animals.iter().map(|s| s.to_string()));
        fields
    }
}

/// Records matching `term`, in their original order.
pub fn filter<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.matches(term)).collect()
}

/// Vaccine types intended for a species, in their original order.
pub fn vaccine_types_for(types: &[VaccineType], species: Species) -> Vec<&VaccineType> {
    types.iter().filter(|v| v.targets(species)).collect()
}

/// Test procedures that apply to an animal of this species and age.
pub fn tests_for(tests: &[TestProcedure], species: Species, age: f64) -> Vec<&TestProcedure> {
    tests.iter().filter(|t| t.applies_to(species, age)).collect()
}
