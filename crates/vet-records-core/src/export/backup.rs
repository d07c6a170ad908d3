//! Backup files of the full record snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;

use crate::dates::local_date;
use crate::db::KeyValueStore;
use crate::store::{RecordStore, StoreError, StoreResult};

/// File name for a backup taken on `date`, e.g. `vet_records_backup_2025-01-05.json`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("vet_records_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Write `export_all` output into `dir` under the dated backup name.
///
/// Returns the written path. An existing backup of the same day is replaced.
pub fn write_backup<S: KeyValueStore, Tz: TimeZone>(
    store: &RecordStore<S>,
    dir: &Path,
    now: DateTime<Utc>,
    tz: &Tz,
) -> StoreResult<PathBuf> {
    let json = store.export_all()?;
    let path = dir.join(backup_file_name(local_date(now, tz)));
    fs::write(&path, json).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "backup written");
    Ok(path)
}
