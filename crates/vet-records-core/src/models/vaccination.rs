//! Vaccination records and their dose schedules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::Species;

/// Age in years above which a female animal's pregnancy status is recorded.
pub const PREGNANCY_MIN_AGE_YEARS: f64 = 1.5;

/// Animal sex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(format!("unknown sex: {}", other)),
        }
    }
}

/// One scheduled administration within a vaccination schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dose {
    /// 1-based position in the schedule
    pub number: u32,
    /// Scheduled instant
    pub date: DateTime<Utc>,
    /// Whether the dose has been given
    pub administered: bool,
}

/// A vaccination record for one animal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: String,
    pub animal_id: String,
    /// Age in years (decimal)
    pub age: f64,
    pub sex: Sex,
    /// Only present for females older than [`PREGNANCY_MIN_AGE_YEARS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pregnant: Option<bool>,
    pub owner_phone: String,
    /// Instant of the first dose
    pub vaccine_time: DateTime<Utc>,
    pub vaccine_type: String,
    pub species: Species,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub doses: Vec<Dose>,
}

impl Vaccination {
    /// Whether pregnancy status applies to an animal of this sex and age.
    pub fn pregnancy_applies(sex: Sex, age: f64) -> bool {
        sex == Sex::Female && age > PREGNANCY_MIN_AGE_YEARS
    }

    /// Doses not yet administered.
    pub fn pending_doses(&self) -> impl Iterator<Item = &Dose> {
        self.doses.iter().filter(|d| !d.administered)
    }

    /// Number of doses given so far.
    pub fn administered_count(&self) -> usize {
        self.doses.iter().filter(|d| d.administered).count()
    }

    /// Whether any dose falls on the given local calendar date.
    pub fn has_dose_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> bool {
        self.doses
            .iter()
            .any(|d| d.date.with_timezone(tz).date_naive() == date)
    }

    /// Mark the dose with the given number as administered.
    ///
    /// Returns false if no dose has that number.
    pub fn mark_administered(&mut self, number: u32) -> bool {
        match self.doses.iter_mut().find(|d| d.number == number) {
            Some(dose) => {
                dose.administered = true;
                true
            }
            None => false,
        }
    }
}
