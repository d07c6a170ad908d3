//! Drugs with per-species dosage tables.

use serde::{Deserialize, Serialize};

use super::{Route, Species};

/// Dosage rate for one species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDosage {
    pub species: Species,
    /// mg per kg body weight
    pub dosage: f64,
}

/// A drug in the local formulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    pub id: String,
    pub name: String,
    /// At most one entry per species
    pub dosages: Vec<SpeciesDosage>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Drug {
    /// Dosage rate (mg/kg) for a species, if the drug has one.
    pub fn dosage_for(&self, species: Species) -> Option<f64> {
        self.dosages
            .iter()
            .find(|d| d.species == species)
            .map(|d| d.dosage)
    }

    /// Whether the drug can be prescribed for a species.
    pub fn is_species_compatible(&self, species: Species) -> bool {
        self.dosage_for(species).is_some()
    }

    /// Whether the drug can be given by a route.
    pub fn offers_route(&self, route: Route) -> bool {
        self.routes.contains(&route)
    }

    /// Route preselected when the drug is added to a prescription.
    ///
    /// Oral when available, otherwise the first configured route.
    pub fn default_route(&self) -> Option<Route> {
        if self.offers_route(Route::Oral) {
            Some(Route::Oral)
        } else {
            self.routes.first().copied()
        }
    }
}
