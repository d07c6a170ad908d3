//! Species and administration route enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Animal species tracked by the records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Sheep,
    Goat,
    Camel,
    Horse,
    Cat,
    Dog,
    Cow,
    Buffalo,
    /// Anything not in the fixed list. Accepted on import, never offered in forms.
    Custom,
}

impl Species {
    /// Species offered in selection lists, in display order.
    pub const SELECTABLE: [Species; 8] = [
        Species::Sheep,
        Species::Goat,
        Species::Camel,
        Species::Horse,
        Species::Cat,
        Species::Dog,
        Species::Cow,
        Species::Buffalo,
    ];

    /// Lowercase code used in storage and search.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Sheep => "sheep",
            Species::Goat => "goat",
            Species::Camel => "camel",
            Species::Horse => "horse",
            Species::Cat => "cat",
            Species::Dog => "dog",
            Species::Cow => "cow",
            Species::Buffalo => "buffalo",
            Species::Custom => "custom",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheep" => Ok(Species::Sheep),
            "goat" => Ok(Species::Goat),
            "camel" => Ok(Species::Camel),
            "horse" => Ok(Species::Horse),
            "cat" => Ok(Species::Cat),
            "dog" => Ok(Species::Dog),
            "cow" => Ok(Species::Cow),
            "buffalo" => Ok(Species::Buffalo),
            "custom" => Ok(Species::Custom),
            other => Err(format!("unknown species: {}", other)),
        }
    }
}

/// Drug administration route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Sc,
    Im,
    Oral,
    Iv,
    Aural,
    Topical,
}

impl Route {
    /// All routes, in display order.
    pub const ALL: [Route; 6] = [
        Route::Sc,
        Route::Im,
        Route::Oral,
        Route::Iv,
        Route::Aural,
        Route::Topical,
    ];

    /// Short code used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Sc => "sc",
            Route::Im => "im",
            Route::Oral => "oral",
            Route::Iv => "iv",
            Route::Aural => "aural",
            Route::Topical => "topical",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Sc => "Subcutaneous (S/C)",
            Route::Im => "Intramuscular (I/M)",
            Route::Oral => "Oral",
            Route::Iv => "Intravenous (I/V)",
            Route::Aural => "Aural",
            Route::Topical => "Topical",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sc" => Ok(Route::Sc),
            "im" => Ok(Route::Im),
            "oral" => Ok(Route::Oral),
            "iv" => Ok(Route::Iv),
            "aural" => Ok(Route::Aural),
            "topical" => Ok(Route::Topical),
            other => Err(format!("unknown route: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_serde_lowercase() {
        let json = serde_json::to_string(&Species::Buffalo).unwrap();
        assert_eq!(json, "\"buffalo\"");

        let parsed: Species = serde_json::from_str("\"cow\"").unwrap();
        assert_eq!(parsed, Species::Cow);
    }

    #[test]
    fn test_species_from_str() {
        assert_eq!("Dog".parse::<Species>().unwrap(), Species::Dog);
        assert_eq!(" camel ".parse::<Species>().unwrap(), Species::Camel);
        assert!("dragon".parse::<Species>().is_err());
    }

    #[test]
    fn test_selectable_excludes_custom() {
        assert!(!Species::SELECTABLE.contains(&Species::Custom));
    }

    #[test]
    fn test_route_codes_and_labels() {
        assert_eq!(Route::Sc.as_str(), "sc");
        assert_eq!(Route::Iv.label(), "Intravenous (I/V)");
        assert_eq!("IM".parse::<Route>().unwrap(), Route::Im);
        assert_eq!(serde_json::to_string(&Route::Topical).unwrap(), "\"topical\"");
    }
}
