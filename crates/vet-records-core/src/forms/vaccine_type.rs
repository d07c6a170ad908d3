//! Vaccine type catalog form.

use super::FormErrors;
use crate::models::{new_record_id, Species, VaccineType};

/// Raw input of the vaccine type form.
#[derive(Debug, Clone, PartialEq)]
pub struct VaccineTypeForm {
    pub name: String,
    pub total_doses: u32,
    pub days_interval: u32,
    pub target_animals: Vec<Species>,
}

impl Default for VaccineTypeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            total_doses: 1,
            days_interval: 0,
            target_animals: Vec::new(),
        }
    }
}

impl VaccineTypeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(vaccine_type: &VaccineType) -> Self {
        Self {
            name: vaccine_type.name.clone(),
            total_doses: vaccine_type.total_doses,
            days_interval: vaccine_type.days_interval,
            target_animals: vaccine_type.target_animals.clone(),
        }
    }

    pub fn toggle_species(&mut self, species: Species) {
        match self.target_animals.iter().position(|s| *s == species) {
            Some(index) => {
                self.target_animals.remove(index);
            }
            None => self.target_animals.push(species),
        }
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Please enter a vaccine name");
        }
        if self.total_doses < 1 {
            errors.add("totalDoses", "At least one dose is required");
        }
        if self.total_doses > 1 && self.days_interval == 0 {
            errors.add(
                "daysInterval",
                "Please specify days interval for multiple doses",
            );
        }
        if self.target_animals.is_empty() {
            errors.add("targetAnimals", "Please select at least one animal species");
        }

        errors
    }

    /// Build the record to save, keeping the id of `existing`.
    pub fn build(&self, existing: Option<&VaccineType>) -> Result<VaccineType, FormErrors> {
        self.validate().into_result()?;

        Ok(VaccineType {
            id: existing.map(|v| v.id.clone()).unwrap_or_else(new_record_id),
            name: self.name.trim().to_string(),
            total_doses: self.total_doses,
            days_interval: if self.total_doses > 1 {
                self.days_interval
            } else {
                0
            },
            target_animals: self.target_animals.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dose_needs_no_interval() {
        let mut form = VaccineTypeForm::new();
        form.name = "Rabies".into();
        form.days_interval = 30;
        form.toggle_species(Species::Dog);

        let vaccine_type = form.build(None).unwrap();
        assert_eq!(vaccine_type.total_doses, 1);
        assert_eq!(vaccine_type.days_interval, 0);
    }

    #[test]
    fn test_multi_dose_needs_interval() {
        let mut form = VaccineTypeForm::new();
        form.name = "FMD".into();
        form.total_doses = 2;
        form.toggle_species(Species::Cow);

        assert_eq!(
            form.validate().get("daysInterval"),
            Some("Please specify days interval for multiple doses")
        );

        form.days_interval = 28;
        assert_eq!(form.build(None).unwrap().days_interval, 28);
    }

    #[test]
    fn test_missing_fields() {
        let errors = VaccineTypeForm::new().validate();
        assert_eq!(errors.get("name"), Some("Please enter a vaccine name"));
        assert_eq!(
            errors.get("targetAnimals"),
            Some("Please select at least one animal species")
        );
        assert_eq!(errors.len(), 2);
    }
}
