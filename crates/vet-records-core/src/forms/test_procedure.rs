//! Test procedure create/edit form.

use super::{parse_number, FormErrors};
use crate::models::{new_record_id, AgeRange, Species, TestProcedure};

/// Raw input of the test procedure form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestForm {
    pub name: String,
    /// One step per line
    pub steps: String,
    pub target_animals: Vec<Species>,
    pub min_age: String,
    pub max_age: String,
}

impl TestForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(test: &TestProcedure) -> Self {
        Self {
            name: test.name.clone(),
            steps: test.steps.join("\n"),
            target_animals: test.target_animals.clone(),
            min_age: test.age_range.min.to_string(),
            max_age: test.age_range.max.to_string(),
        }
    }

    /// Select or deselect a species.
    pub fn toggle_species(&mut self, species: Species) {
        match self.target_animals.iter().position(|s| *s == species) {
            Some(index) => {
                self.target_animals.remove(index);
            }
            None => self.target_animals.push(species),
        }
    }

    /// Non-blank lines of the steps input, trimmed.
    pub fn step_lines(&self) -> Vec<String> {
        self.steps
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Test name is required");
        }

        if self.step_lines().is_empty() {
            errors.add("steps", "Test procedure steps are required");
        }

        if self.target_animals.is_empty() {
            errors.add("targetAnimals", "At least one animal species must be selected");
        }

        let min = parse_number(&self.min_age);
        let max = parse_number(&self.max_age);

        if !min.is_some_and(|m| m >= 0.0) {
            errors.add("minAge", "Minimum age must be a non-negative number");
        }
        if !max.is_some_and(|m| m > 0.0) {
            errors.add("maxAge", "Maximum age must be a positive number");
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min >= max {
                errors.add("ageRange", "Maximum age must be greater than minimum age");
            }
        }

        errors
    }

    /// Build the record to save, keeping the id of `existing`.
    pub fn build(&self, existing: Option<&TestProcedure>) -> Result<TestProcedure, FormErrors> {
        self.validate().into_result()?;

        Ok(TestProcedure {
            id: existing.map(|t| t.id.clone()).unwrap_or_else(new_record_id),
            name: self.name.trim().to_string(),
            steps: self.step_lines(),
            target_animals: self.target_animals.clone(),
            age_range: AgeRange {
                min: parse_number(&self.min_age).unwrap_or_default(),
                max: parse_number(&self.max_age).unwrap_or_default(),
            },
        })
    }
}
