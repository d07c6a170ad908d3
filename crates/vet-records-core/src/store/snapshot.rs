//! Whole-store export and import.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Collection, Record, RecordStore, StoreError, StoreResult};
use crate::db::KeyValueStore;
use crate::models::{Drug, Prescription, TestProcedure, Vaccination};

/// A full export of the four record collections.
///
/// On import any subset of the keys may be present; absent (or null) keys
/// leave their collection untouched and unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccinations: Option<Vec<Vaccination>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<TestProcedure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drugs: Option<Vec<Drug>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriptions: Option<Vec<Prescription>>,
}

impl Snapshot {
    /// Parse a snapshot document.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::MalformedSnapshot(e.to_string()))
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Collections replaced by an import, with their new record counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub replaced: Vec<(Collection, usize)>,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.replaced.iter().map(|(_, n)| n).sum()
    }
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Capture every exported collection.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        Ok(Snapshot {
            vaccinations: Some(self.get_all()?),
            tests: Some(self.get_all()?),
            drugs: Some(self.get_all()?),
            prescriptions: Some(self.get_all()?),
        })
    }

    /// Export every collection as one JSON document.
    pub fn export_all(&self) -> StoreResult<String> {
        let snapshot = self.snapshot()?;
        let json = snapshot.to_json()?;
        info!(bytes = json.len(), "exported snapshot");
        Ok(json)
    }

    /// Import a snapshot document.
    ///
    /// The whole document is parsed before any collection is written, so a
    /// malformed snapshot leaves the store unchanged.
    pub fn import_all(&mut self, json: &str) -> StoreResult<ImportSummary> {
        let snapshot = match Snapshot::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "rejected snapshot import");
                return Err(e);
            }
        };
        self.apply_snapshot(snapshot)
    }

    /// Replace each collection present in the snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> StoreResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        if let Some(records) = snapshot.vaccinations {
            self.replace_collection(&records, &mut summary)?;
        }
        if let Some(records) = snapshot.tests {
            self.replace_collection(&records, &mut summary)?;
        }
        if let Some(records) = snapshot.drugs {
            self.replace_collection(&records, &mut summary)?;
        }
        if let Some(records) = snapshot.prescriptions {
            self.replace_collection(&records, &mut summary)?;
        }

        info!(
            collections = summary.replaced.len(),
            records = summary.total_records(),
            "imported snapshot"
        );
        Ok(summary)
    }

    fn replace_collection<R: Record>(
        &mut self,
        records: &[R],
        summary: &mut ImportSummary,
    ) -> StoreResult<()> {
        self.write_all(records)?;
        summary.replaced.push((R::COLLECTION, records.len()));
        Ok(())
    }
}
