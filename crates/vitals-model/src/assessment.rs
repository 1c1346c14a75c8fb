//! Classifier output and its clinical interpretation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Binary label returned by the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskClass {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk",
            Self::HighRisk => "High Risk",
        }
    }
}

/// Raw classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: RiskClass,
    /// Probability of the high-risk class, in `[0, 1]`.
    pub high_risk_probability: f64,
}

/// Interpreted risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCondition {
    #[serde(rename = "HIGH RISK")]
    High,
    #[serde(rename = "MODERATE RISK")]
    Moderate,
    #[serde(rename = "LOW RISK")]
    Low,
}

impl RiskCondition {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH RISK",
            Self::Moderate => "MODERATE RISK",
            Self::Low => "LOW RISK",
        }
    }
}

/// How urgently the result needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Stable,
    Monitor,
    Critical,
}

impl Severity {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Monitor => "monitor",
            Self::Critical => "critical",
        }
    }
}

/// A prediction interpreted against vital-sign reference ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub risk_score: f64,
    pub risk_probability_percent: f64,
    pub risk_class: RiskClass,
    pub condition: RiskCondition,
    pub severity: Severity,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub predicted_at: DateTime<Local>,
    pub model_confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_serialize_as_display_text() {
        assert_eq!(
            serde_json::to_string(&RiskClass::HighRisk).expect("serialize"),
            r#""High Risk""#
        );
        assert_eq!(
            serde_json::to_string(&RiskCondition::Moderate).expect("serialize"),
            r#""MODERATE RISK""#
        );
        assert_eq!(
            serde_json::to_string(&Severity::Critical).expect("serialize"),
            r#""critical""#
        );
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::Monitor);
        assert!(Severity::Monitor > Severity::Stable);
    }
}
