//! Typed record collections over a key-value store.
//!
//! Each collection is persisted as one JSON array under a fixed key.
//! Records keep insertion order; saving an existing id replaces it in place.

mod demo;
mod snapshot;

pub use demo::*;
pub use snapshot::*;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::db::{DbError, KeyValueStore};
use crate::models::{Drug, Prescription, TestProcedure, Theme, Vaccination, VaccineType};

/// Key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Db(#[from] DbError),

    #[error("Stored collection '{key}' is not valid JSON: {source}")]
    CorruptCollection {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("File error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Named record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Vaccinations,
    Tests,
    Drugs,
    Prescriptions,
    VaccineTypes,
}

impl Collection {
    /// Storage key for the collection.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Vaccinations => "vaccinations",
            Collection::Tests => "tests",
            Collection::Drugs => "drugs",
            Collection::Prescriptions => "prescriptions",
            Collection::VaccineTypes => "vaccine_types",
        }
    }
}

/// A record that lives in a named collection and is identified by id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

impl Record for Vaccination {
    const COLLECTION: Collection = Collection::Vaccinations;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for TestProcedure {
    const COLLECTION: Collection = Collection::Tests;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Drug {
    const COLLECTION: Collection = Collection::Drugs;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Prescription {
    const COLLECTION: Collection = Collection::Prescriptions;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for VaccineType {
    const COLLECTION: Collection = Collection::VaccineTypes;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Record store over an injected key-value backend.
pub struct RecordStore<S> {
    kv: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap a key-value backend.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// All records of a collection, in insertion order.
    pub fn get_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let key = R::COLLECTION.key();
        match self.kv.get(key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|source| StoreError::CorruptCollection { key, source }),
            None => Ok(Vec::new()),
        }
    }

    /// A single record by id.
    pub fn get<R: Record>(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self.get_all::<R>()?.into_iter().find(|r| r.id() == id))
    }

    /// Insert or replace a record by id.
    pub fn save<R: Record>(&mut self, record: R) -> StoreResult<R> {
        let mut records = self.get_all::<R>()?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(index) => records[index] = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records)?;

        debug!(collection = R::COLLECTION.key(), id = record.id(), "record saved");
        Ok(record)
    }

    /// Delete a record by id. Returns whether a record was removed.
    pub fn delete<R: Record>(&mut self, id: &str) -> StoreResult<bool> {
        let records = self.get_all::<R>()?;
        let before = records.len();
        let remaining: Vec<R> = records.into_iter().filter(|r| r.id() != id).collect();
        let removed = remaining.len() != before;

        self.write_all(&remaining)?;

        debug!(collection = R::COLLECTION.key(), id, removed, "record deleted");
        Ok(removed)
    }

    /// Replace a whole collection.
    pub fn write_all<R: Record>(&mut self, records: &[R]) -> StoreResult<()> {
        let json = serde_json::to_string(records)?;
        self.kv.set(R::COLLECTION.key(), &json)?;
        Ok(())
    }

    /// Stored theme preference (light when unset).
    pub fn theme(&self) -> StoreResult<Theme> {
        let value = self.kv.get(THEME_KEY)?;
        Ok(Theme::from_stored(value.as_deref()))
    }

    /// Persist the theme preference.
    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.kv.set(THEME_KEY, theme.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, MemoryStore};
    use crate::models::{AgeRange, Route, Species, SpeciesDosage};

    fn make_drug(id: &str, name: &str) -> Drug {
        Drug {
            id: id.into(),
            name: name.into(),
            dosages: vec![SpeciesDosage {
                species: Species::Cow,
                dosage: 7.0,
            }],
            routes: vec![Route::Im],
        }
    }

    fn make_test(id: &str, name: &str) -> TestProcedure {
        TestProcedure {
            id: id.into(),
            name: name.into(),
            steps: vec!["Step one".into()],
            target_animals: vec![Species::Sheep],
            age_range: AgeRange { min: 0.0, max: 5.0 },
        }
    }

    #[test]
    fn test_get_all_empty() {
        let store = RecordStore::new(MemoryStore::new());
        let drugs: Vec<Drug> = store.get_all().unwrap();
        assert!(drugs.is_empty());
    }

    #[test]
    fn test_save_appends_in_order() {
        let mut store = RecordStore::new(MemoryStore::new());

        store.save(make_drug("a", "Amoxicillin")).unwrap();
        store.save(make_drug("b", "Oxytetracycline")).unwrap();
        store.save(make_drug("c", "Penicillin")).unwrap();

        let ids: Vec<String> = store
            .get_all::<Drug>()
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_save_replaces_in_place() {
        let mut store = RecordStore::new(MemoryStore::new());

        store.save(make_drug("a", "Amoxicillin")).unwrap();
        store.save(make_drug("b", "Oxytetracycline")).unwrap();
        store.save(make_drug("a", "Amoxicillin LA")).unwrap();

        let drugs: Vec<Drug> = store.get_all().unwrap();
        assert_eq!(drugs.len(), 2);
        assert_eq!(drugs[0].id, "a");
        assert_eq!(drugs[0].name, "Amoxicillin LA");
    }

    #[test]
    fn test_get_by_id() {
        let mut store = RecordStore::new(MemoryStore::new());
        store.save(make_test("t1", "Tuberculosis Test")).unwrap();

        let found: Option<TestProcedure> = store.get("t1").unwrap();
        assert_eq!(found.unwrap().name, "Tuberculosis Test");

        let missing: Option<TestProcedure> = store.get("t2").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = RecordStore::new(MemoryStore::new());
        store.save(make_drug("a", "Amoxicillin")).unwrap();

        assert!(!store.delete::<Drug>("zzz").unwrap());
        assert_eq!(store.get_all::<Drug>().unwrap().len(), 1);

        assert!(store.delete::<Drug>("a").unwrap());
        assert!(store.get_all::<Drug>().unwrap().is_empty());
    }

    #[test]
    fn test_collections_are_independent() {
        let mut store = RecordStore::new(MemoryStore::new());
        store.save(make_drug("1", "Amoxicillin")).unwrap();
        store.save(make_test("1", "Brucellosis")).unwrap();

        store.delete::<Drug>("1").unwrap();

        assert!(store.get_all::<Drug>().unwrap().is_empty());
        assert_eq!(store.get_all::<TestProcedure>().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_collection_reported() {
        let mut kv = MemoryStore::new();
        kv.set("drugs", "{not json").unwrap();
        let store = RecordStore::new(kv);

        let result = store.get_all::<Drug>();
        assert!(matches!(
            result,
            Err(StoreError::CorruptCollection { key: "drugs", .. })
        ));
    }

    #[test]
    fn test_theme_default_and_set() {
        let mut store = RecordStore::new(Database::open_in_memory().unwrap());
        assert_eq!(store.theme().unwrap(), Theme::Light);

        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_sqlite_backend() {
        let mut store = RecordStore::new(Database::open_in_memory().unwrap());
        store.save(make_drug("a", "Amoxicillin")).unwrap();

        let drugs: Vec<Drug> = store.get_all().unwrap();
        assert_eq!(drugs, vec![make_drug("a", "Amoxicillin")]);
    }
}
