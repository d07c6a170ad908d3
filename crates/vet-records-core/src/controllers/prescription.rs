//! Prescription builder for the dosage calculator view.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use super::ControllerResult;
use crate::calc::{calculate_dose, drugs_for_species, DosageError};
use crate::db::KeyValueStore;
use crate::forms::{parse_number, FormErrors};
use crate::models::{new_record_id, Drug, PrescribedDrug, Prescription, Route, Species};
use crate::store::RecordStore;

/// Errors while editing the drug list of a prescription.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrescriptionError {
    #[error("No dosage information available for {species} for {drug}")]
    NoDosageForSpecies { drug: String, species: Species },

    #[error("{0} is already added to the prescription")]
    AlreadyAdded(String),

    #[error("Valid weight is required to add drugs")]
    InvalidWeight,

    #[error("{0} has no administration routes")]
    NoRoutes(String),

    #[error("{drug} cannot be given by route {route}")]
    RouteNotOffered { drug: String, route: Route },

    #[error("Drug {0} is not on the prescription")]
    NotSelected(String),
}

impl From<DosageError> for PrescriptionError {
    fn from(e: DosageError) -> Self {
        match e {
            DosageError::NoDosageForSpecies { drug, species } => {
                PrescriptionError::NoDosageForSpecies { drug, species }
            }
            DosageError::InvalidWeight(_) => PrescriptionError::InvalidWeight,
        }
    }
}

pub type PrescriptionResult<T> = Result<T, PrescriptionError>;

/// A drug on the prescription being built.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDrug {
    pub drug: Drug,
    pub route: Route,
    /// Total dose in mg
    pub calculated_dose: f64,
}

/// In-progress prescription.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionBuilder {
    pub animal_id: String,
    species: Species,
    weight: String,
    selected: Vec<SelectedDrug>,
}

impl Default for PrescriptionBuilder {
    fn default() -> Self {
        Self {
            animal_id: String::new(),
            species: Species::Cow,
            weight: String::new(),
            selected: Vec::new(),
        }
    }
}

impl PrescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn selected(&self) -> &[SelectedDrug] {
        &self.selected
    }

    /// Switch species. The drug selection is cleared when it changes.
    pub fn set_species(&mut self, species: Species) {
        if species != self.species {
            self.species = species;
            self.selected.clear();
        }
    }

    /// Set the weight input (kg).
    ///
    /// A valid weight recomputes the dose of every selected drug.
    pub fn set_weight(&mut self, weight: &str) {
        self.weight = weight.to_string();
        if let Some(kg) = self.weight_kg() {
            for item in &mut self.selected {
                if let Some(rate) = item.drug.dosage_for(self.species) {
                    item.calculated_dose = rate * kg;
                }
            }
        }
    }

    /// Parsed weight, if positive.
    pub fn weight_kg(&self) -> Option<f64> {
        parse_number(&self.weight).filter(|w| *w > 0.0)
    }

    /// Drugs that can be added for the current species.
    pub fn available<'a>(&self, drugs: &'a [Drug]) -> Vec<&'a Drug> {
        drugs_for_species(drugs, self.species)
    }

    /// Add a drug with its default route and computed dose.
    pub fn add_drug(&mut self, drug: &Drug) -> PrescriptionResult<&SelectedDrug> {
        if !drug.is_species_compatible(self.species) {
            return Err(PrescriptionError::NoDosageForSpecies {
                drug: drug.name.clone(),
                species: self.species,
            });
        }
        if self.selected.iter().any(|s| s.drug.id == drug.id) {
            return Err(PrescriptionError::AlreadyAdded(drug.name.clone()));
        }
        let weight = self.weight_kg().ok_or(PrescriptionError::InvalidWeight)?;
        let route = drug
            .default_route()
            .ok_or_else(|| PrescriptionError::NoRoutes(drug.name.clone()))?;
        let calculated_dose = calculate_dose(drug, self.species, weight)?;

        self.selected.push(SelectedDrug {
            drug: drug.clone(),
            route,
            calculated_dose,
        });
        Ok(&self.selected[self.selected.len() - 1])
    }

    /// Remove a drug. Returns whether it was selected.
    pub fn remove_drug(&mut self, drug_id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| s.drug.id != drug_id);
        self.selected.len() != before
    }

    /// Change the route of a selected drug to another route it offers.
    pub fn update_route(&mut self, drug_id: &str, route: Route) -> PrescriptionResult<()> {
        let item = self
            .selected
            .iter_mut()
            .find(|s| s.drug.id == drug_id)
            .ok_or_else(|| PrescriptionError::NotSelected(drug_id.to_string()))?;
        if !item.drug.offers_route(route) {
            return Err(PrescriptionError::RouteNotOffered {
                drug: item.drug.name.clone(),
                route,
            });
        }
        item.route = route;
        Ok(())
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.animal_id.trim().is_empty() {
            errors.add("animalId", "Animal ID is required");
        }
        if self.weight_kg().is_none() {
            errors.add("weight", "Valid weight is required");
        }
        if self.selected.is_empty() {
            errors.add("drugs", "At least one drug must be selected");
        }

        errors
    }

    /// Produce the prescription, dated `now`.
    pub fn finalize(&self, now: DateTime<Utc>) -> Result<Prescription, FormErrors> {
        self.validate().into_result()?;

        Ok(Prescription {
            id: new_record_id(),
            animal_id: self.animal_id.trim().to_string(),
            species: self.species,
            weight: self.weight_kg().unwrap_or_default(),
            drugs: self
                .selected
                .iter()
                .map(|s| PrescribedDrug {
                    drug_id: s.drug.id.clone(),
                    route: s.route,
                    calculated_dose: s.calculated_dose,
                })
                .collect(),
            date: now,
        })
    }

    /// Clear the animal, weight and selection, keeping the species.
    pub fn reset(&mut self) {
        self.animal_id.clear();
        self.weight.clear();
        self.selected.clear();
    }
}

/// Save the built prescription and reset the builder.
pub fn submit_prescription<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    builder: &mut PrescriptionBuilder,
    now: DateTime<Utc>,
) -> ControllerResult<Prescription> {
    let prescription = builder.finalize(now)?;
    let saved = store.save(prescription)?;
    builder.reset();

    info!(
        animal_id = %saved.animal_id,
        drugs = saved.drugs.len(),
        total_mg = saved.total_dose_mg(),
        "prescription saved"
    );
    Ok(saved)
}
