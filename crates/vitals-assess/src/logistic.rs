//! JSON-described logistic scorer.
//!
//! ```json
//! {
//!   "features": ["Patient ID", "Heart Rate", ...],
//!   "intercept": -4.2,
//!   "coefficients": [0.0, 0.031, ...],
//!   "threshold": 0.5
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitals_model::{FeatureName, FeatureVector, Prediction, RiskClass};

use crate::classifier::RiskClassifier;
use crate::error::ClassifierError;

fn default_threshold() -> f64 {
    0.5
}

/// Linear model with a logistic link over named features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub features: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Probability at or above which the high-risk class is predicted.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    /// Load a model description from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let text = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&text)?;
        debug!(path = %path.display(), features = model.features.len(), "model loaded");
        Ok(model)
    }

    /// Parse and check a model description.
    pub fn from_json(text: &str) -> Result<Self, ClassifierError> {
        let model: Self =
            serde_json::from_str(text).map_err(|source| ClassifierError::Parse { source })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.features.len() != self.coefficients.len() {
            return Err(ClassifierError::InvalidModel {
                reason: format!(
                    "{} features but {} coefficients",
                    self.features.len(),
                    self.coefficients.len()
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClassifierError::InvalidModel {
                reason: format!("threshold {} is outside [0, 1]", self.threshold),
            });
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ClassifierError::InvalidModel {
                reason: "weights must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Probability of the high-risk class.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let mut logit = self.intercept;
        for (name, coefficient) in self.features.iter().zip(&self.coefficients) {
            let slot = FeatureName::from_name(name)
                .ok_or_else(|| ClassifierError::UnknownFeature { name: name.clone() })?;
            logit += coefficient * features.get(slot);
        }
        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

impl RiskClassifier for LogisticModel {
    fn feature_names(&self) -> Vec<String> {
        self.features.clone()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let high_risk_probability = self.probability(features)?;
        let class = if high_risk_probability >= self.threshold {
            RiskClass::HighRisk
        } else {
            RiskClass::LowRisk
        };
        Ok(Prediction {
            class,
            high_risk_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_model::feature_names;

    fn model_json(coefficients: &[f64]) -> String {
        serde_json::json!({
            "features": feature_names(),
            "intercept": 0.0,
            "coefficients": coefficients,
        })
        .to_string()
    }

    #[test]
    fn zero_weights_give_even_odds() {
        let model = LogisticModel::from_json(&model_json(&[0.0; 14])).expect("model");
        assert_eq!(model.threshold, 0.5);
        let prediction = model.predict(&FeatureVector::default()).expect("predict");
        assert_eq!(prediction.high_risk_probability, 0.5);
        assert_eq!(prediction.class, RiskClass::HighRisk);
    }

    #[test]
    fn weights_follow_feature_names() {
        let mut coefficients = [0.0; 14];
        coefficients[1] = -0.1;
        let model = LogisticModel::from_json(&model_json(&coefficients)).expect("model");
        let features = FeatureVector {
            heart_rate: 80.0,
            ..FeatureVector::default()
        };
        let prediction = model.predict(&features).expect("predict");
        assert!(prediction.high_risk_probability < 0.01);
        assert_eq!(prediction.class, RiskClass::LowRisk);
    }

    #[test]
    fn inconsistent_models_are_rejected() {
        assert!(matches!(
            LogisticModel::from_json(&model_json(&[0.0; 3])),
            Err(ClassifierError::InvalidModel { .. })
        ));
        assert!(matches!(
            LogisticModel::from_json("{not json"),
            Err(ClassifierError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_feature_fails_prediction() {
        let model = LogisticModel {
            features: vec!["Shoe Size".to_string()],
            intercept: 0.0,
            coefficients: vec![1.0],
            threshold: 0.5,
        };
        assert!(matches!(
            model.predict(&FeatureVector::default()),
            Err(ClassifierError::UnknownFeature { .. })
        ));
    }
}
