//! Vaccination create/edit form.

use chrono::{DateTime, TimeZone, Utc};

use super::{parse_number, FormErrors};
use crate::calc::{generate_schedule, infer_interval_days, ScheduleError};
use crate::dates::{combine_date_and_time, current_time_string, split_date_and_time, today_string};
use crate::models::{new_record_id, Sex, Species, Vaccination, VaccineType};
use crate::search::vaccine_types_for;

/// Raw input of the vaccination form.
#[derive(Debug, Clone, PartialEq)]
pub struct VaccinationForm {
    pub animal_id: String,
    pub age: String,
    pub sex: Sex,
    pub is_pregnant: bool,
    pub owner_phone: String,
    /// `YYYY-MM-DD`
    pub vaccine_date: String,
    /// `HH:MM`
    pub vaccine_time: String,
    pub vaccine_type: String,
    pub species: Species,
    pub notes: String,
    pub total_doses: u32,
    pub days_interval: u32,
}

impl VaccinationForm {
    /// Empty form dated now.
    pub fn new<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            animal_id: String::new(),
            age: String::new(),
            sex: Sex::Male,
            is_pregnant: false,
            owner_phone: String::new(),
            vaccine_date: today_string(now, tz),
            vaccine_time: current_time_string(now, tz),
            vaccine_type: String::new(),
            species: Species::Cow,
            notes: String::new(),
            total_doses: 1,
            days_interval: 0,
        }
    }

    /// Form prefilled from a saved vaccination.
    pub fn from_existing<Tz: TimeZone>(vaccination: &Vaccination, tz: &Tz) -> Self {
        let (vaccine_date, vaccine_time) = split_date_and_time(vaccination.vaccine_time, tz);
        Self {
            animal_id: vaccination.animal_id.clone(),
            age: vaccination.age.to_string(),
            sex: vaccination.sex,
            is_pregnant: vaccination.is_pregnant.unwrap_or(false),
            owner_phone: vaccination.owner_phone.clone(),
            vaccine_date,
            vaccine_time,
            vaccine_type: vaccination.vaccine_type.clone(),
            species: vaccination.species,
            notes: vaccination.notes.clone().unwrap_or_default(),
            total_doses: vaccination.doses.len() as u32,
            days_interval: infer_interval_days(&vaccination.doses, tz),
        }
    }

    /// Take the name and dose plan from a catalog vaccine type.
    pub fn apply_vaccine_type(&mut self, vaccine_type: &VaccineType) {
        self.vaccine_type = vaccine_type.name.clone();
        self.total_doses = vaccine_type.total_doses;
        self.days_interval = vaccine_type.days_interval;
    }

    /// Catalog vaccine types offered for the form's species.
    pub fn vaccine_type_choices<'a>(&self, types: &'a [VaccineType]) -> Vec<&'a VaccineType> {
        vaccine_types_for(types, self.species)
    }

    /// Apply the offered vaccine type whose name matches the form's, ignoring case.
    ///
    /// Returns false, leaving the form unchanged, when there is none.
    pub fn apply_catalog_entry(&mut self, types: &[VaccineType]) -> bool {
        let name = self.vaccine_type.trim().to_lowercase();
        let found = self
            .vaccine_type_choices(types)
            .into_iter()
            .find(|v| v.name.to_lowercase() == name)
            .cloned();
        match found {
            Some(vaccine_type) => {
                self.apply_vaccine_type(&vaccine_type);
                true
            }
            None => false,
        }
    }

    /// Whether the pregnancy toggle should be shown.
    pub fn shows_pregnancy(&self) -> bool {
        parse_number(&self.age)
            .map(|age| Vaccination::pregnancy_applies(self.sex, age))
            .unwrap_or(false)
    }

    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.animal_id.trim().is_empty() {
            errors.add("animalId", "Animal ID is required");
        }

        if self.age.trim().is_empty() {
            errors.add("age", "Age is required");
        } else if !parse_number(&self.age).is_some_and(|age| age > 0.0) {
            errors.add("age", "Age must be a positive number");
        }

        if self.owner_phone.trim().is_empty() {
            errors.add("ownerPhone", "Owner phone is required");
        }

        if self.vaccine_type.trim().is_empty() {
            errors.add("vaccineType", "Vaccine type is required");
        }

        if self.total_doses < 1 {
            errors.add("totalDoses", "At least one dose is required");
        }

        if self.total_doses > 1 && self.days_interval == 0 {
            errors.add(
                "daysInterval",
                "Days interval must be positive for multiple doses",
            );
        }

        if let Err(e) = combine_date_and_time(&self.vaccine_date, &self.vaccine_time, tz) {
            errors.add("vaccineTime", e.to_string());
        }

        errors
    }

    /// Build the record to save.
    ///
    /// With `existing`, the id is kept and administered flags carry over by
    /// dose index; otherwise a new id is minted and the first dose counts as
    /// given.
    pub fn build<Tz: TimeZone>(
        &self,
        existing: Option<&Vaccination>,
        tz: &Tz,
    ) -> Result<Vaccination, FormErrors> {
        self.validate(tz).into_result()?;

        let vaccine_time = combine_date_and_time(&self.vaccine_date, &self.vaccine_time, tz)
            .map_err(|e| single_error("vaccineTime", e.to_string()))?;
        let prior = existing.map(|v| v.doses.as_slice()).unwrap_or(&[]);

        let doses = generate_schedule(
            vaccine_time,
            self.total_doses,
            self.days_interval,
            prior,
            existing.is_none(),
            tz,
        )
        .map_err(|e| match e {
            ScheduleError::NoDoses => single_error("totalDoses", e.to_string()),
            ScheduleError::MissingInterval => single_error("daysInterval", e.to_string()),
            ScheduleError::Date(_) => single_error("vaccineTime", e.to_string()),
        })?;

        let age = parse_number(&self.age).unwrap_or_default();
        let notes = self.notes.trim();

        Ok(Vaccination {
            id: existing.map(|v| v.id.clone()).unwrap_or_else(new_record_id),
            animal_id: self.animal_id.trim().to_string(),
            age,
            sex: self.sex,
            is_pregnant: Vaccination::pregnancy_applies(self.sex, age).then_some(self.is_pregnant),
            owner_phone: self.owner_phone.trim().to_string(),
            vaccine_time,
            vaccine_type: self.vaccine_type.trim().to_string(),
            species: self.species,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            doses,
        })
    }
}

fn single_error(field: &'static str, message: String) -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add(field, message);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::test_zones::FallBack;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap()
    }

    fn filled() -> VaccinationForm {
        let mut form = VaccinationForm::new(now(), &Utc);
        form.animal_id = " COW-001 ".into();
        form.age = "2".into();
        form.sex = Sex::Female;
        form.is_pregnant = true;
        form.owner_phone = "555-1234".into();
        form.vaccine_type = "FMD Vaccine".into();
        form.total_doses = 2;
        form.days_interval = 7;
        form
    }

    #[test]
    fn test_new_form_defaults() {
        let form = VaccinationForm::new(now(), &Utc);
        assert_eq!(form.vaccine_date, "2025-01-01");
        assert_eq!(form.vaccine_time, "09:30");
        assert_eq!(form.total_doses, 1);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut form = VaccinationForm::new(now(), &Utc);
        form.age = "-2".into();
        form.total_doses = 3;

        let errors = form.validate(&Utc);
        assert_eq!(errors.get("animalId"), Some("Animal ID is required"));
        assert_eq!(errors.get("age"), Some("Age must be a positive number"));
        assert_eq!(errors.get("ownerPhone"), Some("Owner phone is required"));
        assert_eq!(errors.get("vaccineType"), Some("Vaccine type is required"));
        assert_eq!(
            errors.get("daysInterval"),
            Some("Days interval must be positive for multiple doses")
        );
        assert_eq!(errors.get("totalDoses"), None);
    }

    #[test]
    fn test_zero_doses_rejected() {
        let mut form = filled();
        form.total_doses = 0;
        assert_eq!(
            form.validate(&Utc).get("totalDoses"),
            Some("At least one dose is required")
        );
    }

    #[test]
    fn test_bad_time_rejected() {
        let mut form = filled();
        form.vaccine_time = "25:99".into();
        assert!(form.validate(&Utc).get("vaccineTime").is_some());
        assert!(form.build(None, &Utc).is_err());
    }

    #[test]
    fn test_build_new_record() {
        let vaccination = filled().build(None, &Utc).unwrap();

        assert_eq!(vaccination.animal_id, "COW-001");
        assert_eq!(vaccination.is_pregnant, Some(true));
        assert_eq!(vaccination.notes, None);
        assert_eq!(vaccination.doses.len(), 2);
        assert!(vaccination.doses[0].administered);
        assert!(!vaccination.doses[1].administered);
        assert_eq!(
            vaccination.doses[1].date,
            Utc.with_ymd_and_hms(2025, 1, 8, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_pregnancy_dropped_for_young_or_male() {
        let mut form = filled();
        form.age = "1".into();
        assert!(!form.shows_pregnancy());
        assert_eq!(form.build(None, &Utc).unwrap().is_pregnant, None);

        let mut form = filled();
        form.sex = Sex::Male;
        assert_eq!(form.build(None, &Utc).unwrap().is_pregnant, None);
    }

    #[test]
    fn test_edit_round_trip() {
        let mut original = filled().build(None, &Utc).unwrap();
        original.doses[0].administered = false;
        original.doses[1].administered = true;

        let mut form = VaccinationForm::from_existing(&original, &Utc);
        assert_eq!(form.days_interval, 7);
        assert_eq!(form.total_doses, 2);
        assert_eq!(form.vaccine_time, "09:30");

        form.total_doses = 3;
        let edited = form.build(Some(&original), &Utc).unwrap();

        assert_eq!(edited.id, original.id);
        assert!(!edited.doses[0].administered);
        assert!(edited.doses[1].administered);
        assert!(!edited.doses[2].administered);
    }

    #[test]
    fn test_edit_across_fall_back_keeps_schedule() {
        let start = Utc.with_ymd_and_hms(2025, 10, 20, 8, 0, 0).unwrap();
        let mut form = VaccinationForm::new(start, &FallBack);
        form.animal_id = "COW-002".into();
        form.age = "3".into();
        form.owner_phone = "555-9876".into();
        form.vaccine_type = "FMD Vaccine".into();
        form.total_doses = 2;
        form.days_interval = 7;
        let original = form.build(None, &FallBack).unwrap();

        let form = VaccinationForm::from_existing(&original, &FallBack);
        assert_eq!(form.days_interval, 7);

        let edited = form.build(Some(&original), &FallBack).unwrap();
        assert_eq!(edited.doses, original.doses);
    }

    #[test]
    fn test_apply_vaccine_type() {
        let mut form = VaccinationForm::new(now(), &Utc);
        form.apply_vaccine_type(&VaccineType {
            id: "v".into(),
            name: "Brucellosis".into(),
            total_doses: 3,
            days_interval: 21,
            target_animals: vec![Species::Cow],
        });

        assert_eq!(form.vaccine_type, "Brucellosis");
        assert_eq!(form.total_doses, 3);
        assert_eq!(form.days_interval, 21);
    }

    #[test]
    fn test_catalog_choices_follow_species() {
        let types = vec![
            VaccineType {
                id: "fmd".into(),
                name: "FMD Vaccine".into(),
                total_doses: 2,
                days_interval: 28,
                target_animals: vec![Species::Cow, Species::Buffalo],
            },
            VaccineType {
                id: "rabies".into(),
                name: "Rabies".into(),
                total_doses: 1,
                days_interval: 0,
                target_animals: vec![Species::Dog],
            },
        ];

        let mut form = filled();
        form.species = Species::Buffalo;
        form.vaccine_type = "fmd vaccine".into();
        form.total_doses = 1;
        form.days_interval = 0;
        assert_eq!(form.vaccine_type_choices(&types).len(), 1);
        assert!(form.apply_catalog_entry(&types));
        assert_eq!(form.vaccine_type, "FMD Vaccine");
        assert_eq!((form.total_doses, form.days_interval), (2, 28));

        // rabies is not offered for buffalo
        form.vaccine_type = "Rabies".into();
        assert!(!form.apply_catalog_entry(&types));
        assert_eq!(form.vaccine_type, "Rabies");
        assert_eq!(form.total_doses, 2);
    }
}
