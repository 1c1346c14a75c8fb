//! Classifier boundary.

use vitals_model::{FeatureVector, Prediction, feature_names};

use crate::error::{AssessError, ClassifierError, Result};

/// A pre-trained binary risk classifier.
///
/// Implementations consume the 14-slot feature vector and return the
/// predicted class together with the probability of the high-risk class.
pub trait RiskClassifier: Send + Sync {
    /// Column names the model was trained on, in order.
    fn feature_names(&self) -> Vec<String>;

    fn predict(&self, features: &FeatureVector) -> std::result::Result<Prediction, ClassifierError>;
}

/// Compare a classifier's trained columns with the pipeline's contract.
///
/// Names must match exactly and in order; the first difference is reported.
pub fn check_schema(trained: &[String]) -> Result<()> {
    let contract = feature_names();
    let longest = contract.len().max(trained.len());
    for position in 0..longest {
        let expected = contract.get(position).copied();
        let found = trained.get(position).map(String::as_str);
        if expected != found {
            return Err(AssessError::SchemaMismatch {
                position,
                expected: expected.unwrap_or("<none>").to_string(),
                found: found.map(str::to_string),
            });
        }
    }
    Ok(())
}
