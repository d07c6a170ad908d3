//! Weight-based dosage calculation.

use thiserror::Error;

use crate::models::{Drug, Species};

/// Dosage lookup failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DosageError {
    #[error("No dosage information available for {species} for {drug}")]
    NoDosageForSpecies { drug: String, species: Species },

    #[error("Weight must be a positive number of kg, got {0}")]
    InvalidWeight(f64),
}

pub type DosageResult<T> = Result<T, DosageError>;

/// Total dose in mg: species rate (mg/kg) times body weight (kg).
pub fn calculate_dose(drug: &Drug, species: Species, weight_kg: f64) -> DosageResult<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(DosageError::InvalidWeight(weight_kg));
    }
    let rate = drug
        .dosage_for(species)
        .ok_or_else(|| DosageError::NoDosageForSpecies {
            drug: drug.name.clone(),
            species,
        })?;
    Ok(rate * weight_kg)
}

/// Drugs that carry a dosage for the species, in their original order.
pub fn drugs_for_species(drugs: &[Drug], species: Species) -> Vec<&Drug> {
    drugs
        .iter()
        .filter(|d| d.is_species_compatible(species))
        .collect()
}

/// Dose display with two decimals, e.g. `1750.00 mg`.
pub fn format_dose_mg(dose_mg: f64) -> String {
    format!("{:.2} mg", dose_mg)
}
