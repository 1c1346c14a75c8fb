//! Persistence error types.
//!
//! Every store operation returns a structured error with a user-facing
//! message and, where one exists, a remediation hint.

use std::path::PathBuf;

use thiserror::Error;
use vitals_transform::ValidationError;

/// Record store error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store exists but is not an array of objects.
    #[error("Invalid record store format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// A record could not be encoded.
    #[error("Failed to serialize patient record")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// The store is not valid JSON, or an entry does not describe a record.
    #[error("Failed to deserialize record store: {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Temp file could not be renamed over the store.
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No stored record carries the requested case id.
    #[error("No record found for case ID '{case_id}'")]
    CaseNotFound { case_id: String },

    /// The request itself was refused before touching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a patient record store: {}",
                path.display(),
                reason
            ),
            Self::Serialization { .. } => {
                "An error occurred while encoding the patient record.".to_string()
            }
            Self::Deserialization { path, .. } => format!(
                "The record store at {} could not be read. The file may be corrupted.",
                path.display()
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the record store to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::CaseNotFound { case_id } => {
                format!("There is no stored patient with case ID '{case_id}'.")
            }
            Self::Validation(err) => err.to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that you have permission to read the record store.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } | Self::Deserialization { .. } => {
                Some("Restore the store from a backup or point to a different file.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different store location.".into())
            }
            Self::CaseNotFound { .. } => {
                Some("List the stored records to check the case ID.".into())
            }
            Self::Validation(_) => Some("Enter a case ID.".into()),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
