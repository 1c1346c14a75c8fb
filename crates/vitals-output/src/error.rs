//! Error types for tabular export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum OutputError {
    /// There were no rows to write.
    #[error("no data rows to export")]
    NoRows,

    /// The CSV encoder failed.
    #[error("failed to encode CSV")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// The export file could not be written.
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, OutputError>;
