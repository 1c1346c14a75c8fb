//! Error types for classifier loading and risk assessment.

use std::path::PathBuf;

use thiserror::Error;
use vitals_transform::{FeatureError, ValidationError};

/// Errors raised by a classifier implementation.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Model file could not be read.
    #[error("failed to read model file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model description is not valid JSON for this scorer.
    #[error("failed to parse model description")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// Model description parsed but is internally inconsistent.
    #[error("invalid model: {reason}")]
    InvalidModel { reason: String },

    /// The model refers to a feature the pipeline does not produce.
    #[error("model uses unknown feature '{name}'")]
    UnknownFeature { name: String },
}

/// Errors raised while assessing one patient snapshot.
///
/// When any of these is returned, no assessment was produced.
#[derive(Debug, Error)]
pub enum AssessError {
    /// Required inputs were missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The snapshot could not be turned into a feature vector.
    #[error(transparent)]
    Preprocessing(#[from] FeatureError),

    /// The classifier was trained on different columns.
    #[error(
        "classifier feature schema mismatch at position {position}: expected '{expected}', found '{}'",
        found.as_deref().unwrap_or("<none>")
    )]
    SchemaMismatch {
        position: usize,
        expected: String,
        found: Option<String>,
    },

    /// The classifier failed.
    #[error("prediction failed")]
    Classifier(#[from] ClassifierError),

    /// The classifier returned a probability outside `[0, 1]`.
    #[error("classifier returned invalid probability {value}")]
    InvalidProbability { value: f64 },

    /// The background assessment worker could not be started or went away.
    #[error("assessment worker unavailable")]
    WorkerUnavailable {
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type for assessment.
pub type Result<T> = std::result::Result<T, AssessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_message() {
        let err = AssessError::SchemaMismatch {
            position: 13,
            expected: "Gender_Male".to_string(),
            found: None,
        };
        assert_eq!(
            err.to_string(),
            "classifier feature schema mismatch at position 13: expected 'Gender_Male', found '<none>'"
        );
    }

    #[test]
    fn validation_is_transparent() {
        let err = AssessError::from(ValidationError::Missing { field: "Age" });
        assert_eq!(err.to_string(), "Age is required");
    }
}
