//! Sample records for a fresh install.

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use super::{RecordStore, StoreError, StoreResult};
use crate::calc::generate_schedule;
use crate::db::KeyValueStore;
use crate::models::{
    new_record_id, AgeRange, Drug, Route, Sex, Species, SpeciesDosage, TestProcedure,
    Vaccination,
};

/// Which collections received sample data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub vaccinations: bool,
    pub tests: bool,
    pub drugs: bool,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Write one sample record into each of vaccinations, tests and drugs
    /// that is still empty.
    pub fn seed_demo_data<Tz: TimeZone>(
        &mut self,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> StoreResult<SeedReport> {
        let mut report = SeedReport::default();

        if self.get_all::<Vaccination>()?.is_empty() {
            self.save(sample_vaccination(now, tz)?)?;
            report.vaccinations = true;
        }
        if self.get_all::<TestProcedure>()?.is_empty() {
            self.save(sample_test())?;
            report.tests = true;
        }
        if self.get_all::<Drug>()?.is_empty() {
            self.save(sample_drug())?;
            report.drugs = true;
        }

        info!(?report, "demo data seeded");
        Ok(report)
    }
}

fn sample_vaccination<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> StoreResult<Vaccination> {
    let doses = generate_schedule(now, 2, 7, &[], true, tz)
        .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

    Ok(Vaccination {
        id: new_record_id(),
        animal_id: "COW-001".into(),
        age: 2.0,
        sex: Sex::Female,
        is_pregnant: Some(false),
        owner_phone: "555-1234".into(),
        vaccine_time: now,
        vaccine_type: "FMD Vaccine".into(),
        species: Species::Cow,
        notes: Some("First vaccination".into()),
        doses,
    })
}

fn sample_test() -> TestProcedure {
    TestProcedure {
        id: new_record_id(),
        name: "Tuberculosis Test".into(),
        steps: vec![
            "Clean the area with antiseptic".into(),
            "Measure 2mm of tuberculin".into(),
            "Inject intradermally".into(),
            "Check for reaction after 72 hours".into(),
        ],
        target_animals: vec![Species::Cow, Species::Buffalo],
        age_range: AgeRange { min: 1.0, max: 10.0 },
    }
}

fn sample_drug() -> Drug {
    Drug {
        id: new_record_id(),
        name: "Amoxicillin".into(),
        dosages: vec![
            SpeciesDosage {
                species: Species::Cow,
                dosage: 7.0,
            },
            SpeciesDosage {
                species: Species::Dog,
                dosage: 10.0,
            },
            SpeciesDosage {
                species: Species::Cat,
                dosage: 8.0,
            },
        ],
        routes: vec![Route::Im, Route::Oral],
    }
}
