//! Prescriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Route, Species};

/// One drug line on a prescription.
///
/// `drug_id` is a weak reference: the drug may since have been edited or
/// deleted, and `calculated_dose` is frozen at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedDrug {
    pub drug_id: String,
    pub route: Route,
    /// Total dose in mg
    pub calculated_dose: f64,
}

/// A prescription for one animal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub animal_id: String,
    pub species: Species,
    /// Body weight in kg
    pub weight: f64,
    pub drugs: Vec<PrescribedDrug>,
    pub date: DateTime<Utc>,
}

impl Prescription {
    /// Sum of all calculated doses in mg.
    pub fn total_dose_mg(&self) -> f64 {
        self.drugs.iter().map(|d| d.calculated_dose).sum()
    }

    /// Whether the prescription references a drug id.
    pub fn references_drug(&self, drug_id: &str) -> bool {
        self.drugs.iter().any(|d| d.drug_id == drug_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialized_shape_and_total() {
        let prescription = Prescription {
            id: "rx-1".into(),
            animal_id: "COW-001".into(),
            species: Species::Cow,
            weight: 250.0,
            drugs: vec![
                PrescribedDrug {
                    drug_id: "1".into(),
                    route: Route::Im,
                    calculated_dose: 1750.0,
                },
                PrescribedDrug {
                    drug_id: "2".into(),
                    route: Route::Oral,
                    calculated_dose: 250.0,
                },
            ],
            date: Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&prescription).unwrap();
        assert_eq!(json["drugs"][0]["drugId"], "1");
        assert_eq!(json["drugs"][0]["calculatedDose"], 1750.0);
        assert_eq!(json["drugs"][1]["route"], "oral");

        assert_eq!(prescription.total_dose_mg(), 2000.0);
        assert!(prescription.references_drug("2"));
        assert!(!prescription.references_drug("3"));
    }
}
