//! The patient record store.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;
use vitals_model::PatientRecord;
use vitals_transform::require_case_id;

use crate::error::{PersistenceError, Result};
use crate::io::{load_entries, save_entries};

/// Key that identifies a record inside the store.
const CASE_ID_KEY: &str = "case_id";

/// A single JSON file holding an array of patient records.
///
/// Every operation reads the whole file and, when it changes anything,
/// rewrites the whole file. Concurrent writers are not coordinated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records, oldest first.
    pub fn list(&self) -> Result<Vec<PatientRecord>> {
        load_entries(&self.path)?
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry).map_err(|source| PersistenceError::Deserialization {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Records whose case id equals `case_id`.
    pub fn find(&self, case_id: &str) -> Result<Vec<PatientRecord>> {
        let case_id = require_case_id(case_id)?;
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.case_id == case_id)
            .collect())
    }

    /// Append one record, creating the store if needed. Returns the new record count.
    ///
    /// Entries already in the store are written back untouched, including
    /// fields this version does not know about.
    pub fn append(&self, record: &PatientRecord) -> Result<usize> {
        let entry = serde_json::to_value(record)
            .map_err(|source| PersistenceError::Serialization { source })?;
        let mut entries = load_entries(&self.path)?;
        entries.push(entry);
        save_entries(&self.path, &entries)?;
        info!(path = %self.path.display(), records = entries.len(), "record appended");
        Ok(entries.len())
    }

    /// Remove every record whose case id matches exactly. Returns how many were removed.
    pub fn delete(&self, case_id: &str) -> Result<usize> {
        let case_id = require_case_id(case_id)?;
        let mut entries = load_entries(&self.path)?;
        let before = entries.len();
        entries.retain(|entry| !case_id_matches(entry, case_id));
        let removed = before - entries.len();
        if removed == 0 {
            return Err(PersistenceError::CaseNotFound {
                case_id: case_id.to_string(),
            });
        }
        save_entries(&self.path, &entries)?;
        info!(path = %self.path.display(), removed, "records deleted");
        Ok(removed)
    }
}

/// Case ids may have been stored as JSON numbers by older writers.
fn case_id_matches(entry: &Value, case_id: &str) -> bool {
    match entry.get(CASE_ID_KEY) {
        Some(Value::String(stored)) => stored == case_id,
        Some(Value::Number(stored)) => stored.to_string() == case_id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_case_ids_match_their_text() {
        assert!(case_id_matches(&json!({"case_id": 42}), "42"));
        assert!(case_id_matches(&json!({"case_id": "42"}), "42"));
        assert!(!case_id_matches(&json!({"case_id": "42 "}), "42"));
        assert!(!case_id_matches(&json!({"name": "42"}), "42"));
    }
}
