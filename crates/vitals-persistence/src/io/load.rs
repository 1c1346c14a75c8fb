//! Store loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::{PersistenceError, Result};

/// Read every entry of the store. A store that does not exist yet is empty.
pub fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "record store absent; treating as empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value: Value =
        serde_json::from_str(&text).map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;

    let Value::Array(entries) = value else {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "top-level value is not an array".to_string(),
        });
    };
    if let Some(index) = entries.iter().position(|entry| !entry.is_object()) {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("entry {index} is not an object"),
        });
    }
    Ok(entries)
}
