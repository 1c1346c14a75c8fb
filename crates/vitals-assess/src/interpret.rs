//! Clinical interpretation of a classifier prediction.
//!
//! The prediction sets the risk band. Vital signs outside reference ranges
//! add alerts and recommendations; a value of zero means "not measured" and
//! is never flagged.

use chrono::Local;
use vitals_model::{Assessment, FeatureVector, Prediction, RiskClass, RiskCondition, Severity};
use vitals_transform::normalization::round_to;

/// High-risk probability above which a low-risk label is reported as moderate.
pub const MODERATE_RISK_PROBABILITY: f64 = 0.3;

/// Alert used when nothing else was raised.
pub const NO_ALERTS: &str = "No critical alerts";

#[derive(Debug, Default)]
struct Findings {
    alerts: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn alert(&mut self, alert: &str, recommendations: &[&str]) {
        self.alerts.push(alert.to_string());
        self.recommendations
            .extend(recommendations.iter().map(|r| (*r).to_string()));
    }

    fn recommend(&mut self, recommendation: &str) {
        self.recommendations.push(recommendation.to_string());
    }
}

/// Build an [`Assessment`] from a prediction and the features it was made on.
pub fn interpret(prediction: Prediction, features: &FeatureVector) -> Assessment {
    let probability = prediction.high_risk_probability;
    let mut findings = Findings::default();

    let (condition, mut severity) = match prediction.class {
        RiskClass::HighRisk => {
            findings.alert(
                "Patient classified as HIGH RISK by AI model",
                &[
                    "Immediate physician consultation required",
                    "Continuous monitoring recommended",
                ],
            );
            (RiskCondition::High, Severity::Critical)
        }
        RiskClass::LowRisk if probability > MODERATE_RISK_PROBABILITY => {
            findings.alert(
                "Patient classified as LOW RISK but close to threshold",
                &["Increase monitoring frequency"],
            );
            (RiskCondition::Moderate, Severity::Monitor)
        }
        RiskClass::LowRisk => {
            findings.recommend("Continue routine monitoring");
            (RiskCondition::Low, Severity::Stable)
        }
    };

    let hr = features.heart_rate;
    if hr > 0.0 {
        if hr < 60.0 {
            findings.alert(
                "Bradycardia: Heart rate < 60 bpm",
                &["Assess for cardiac issues"],
            );
        } else if hr > 100.0 {
            findings.alert(
                "Tachycardia: Heart rate > 100 bpm",
                &["Investigate cause of elevated heart rate"],
            );
        }
    }

    let (systolic, diastolic) = (features.systolic_bp, features.diastolic_bp);
    if systolic > 0.0 && diastolic > 0.0 {
        if systolic >= 140.0 || diastolic >= 90.0 {
            findings.alert(
                "Hypertension detected",
                &["Blood pressure management needed"],
            );
        } else if systolic < 90.0 || diastolic < 60.0 {
            findings.alert("Hypotension detected", &["Monitor for signs of shock"]);
        }
    }

    let spo2 = features.oxygen_saturation;
    if spo2 > 0.0 {
        if spo2 < 90.0 {
            findings.alert(
                "CRITICAL: Severe hypoxemia (SpO2 < 90%)",
                &["Immediate oxygen therapy required"],
            );
            severity = Severity::Critical;
        } else if spo2 < 95.0 {
            findings.alert(
                "Low oxygen saturation (SpO2 < 95%)",
                &["Consider supplemental oxygen"],
            );
        }
    }

    let temperature = features.body_temperature;
    if temperature > 0.0 {
        if temperature >= 38.0 {
            findings.alert(
                "Fever detected (>=38C)",
                &[
                    "Monitor temperature regularly",
                    "Consider antipyretics if indicated",
                ],
            );
        } else if temperature < 36.0 {
            findings.alert("Hypothermia detected (<36C)", &["Warming measures required"]);
        }
    }

    let rr = features.respiratory_rate;
    if rr > 0.0 {
        if rr < 12.0 {
            findings.alert(
                "Bradypnea: Respiratory rate < 12",
                &["Assess respiratory function"],
            );
        } else if rr > 20.0 {
            findings.alert(
                "Tachypnea: Respiratory rate > 20",
                &["Evaluate for respiratory distress"],
            );
        }
    }

    if features.age > 65.0 && severity == Severity::Critical {
        findings.recommend("Elderly patient: Consider ICU admission");
    }

    if findings.alerts.is_empty() {
        findings.alerts.push(NO_ALERTS.to_string());
    }

    Assessment {
        risk_score: round_to(probability, 3),
        risk_probability_percent: round_to(probability * 100.0, 1),
        risk_class: prediction.class,
        condition,
        severity,
        alerts: findings.alerts,
        recommendations: findings.recommendations,
        predicted_at: Local::now(),
        model_confidence: round_to(probability.max(1.0 - probability), 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_vitals() -> FeatureVector {
        FeatureVector {
            heart_rate: 72.0,
            respiratory_rate: 16.0,
            body_temperature: 36.8,
            oxygen_saturation: 98.0,
            systolic_bp: 118.0,
            diastolic_bp: 76.0,
            age: 40.0,
            ..FeatureVector::default()
        }
    }

    fn low(probability: f64) -> Prediction {
        Prediction {
            class: RiskClass::LowRisk,
            high_risk_probability: probability,
        }
    }

    #[test]
    fn low_risk_with_normal_vitals() {
        let assessment = interpret(low(0.1234), &normal_vitals());
        assert_eq!(assessment.condition, RiskCondition::Low);
        assert_eq!(assessment.severity, Severity::Stable);
        assert_eq!(assessment.alerts, vec![NO_ALERTS.to_string()]);
        assert_eq!(assessment.recommendations, vec!["Continue routine monitoring"]);
        assert_eq!(assessment.risk_score, 0.123);
        assert_eq!(assessment.risk_probability_percent, 12.3);
        assert_eq!(assessment.model_confidence, 0.877);
    }

    #[test]
    fn low_label_near_threshold_is_moderate() {
        let assessment = interpret(low(0.45), &normal_vitals());
        assert_eq!(assessment.condition, RiskCondition::Moderate);
        assert_eq!(assessment.severity, Severity::Monitor);
        assert_eq!(
            assessment.alerts,
            vec!["Patient classified as LOW RISK but close to threshold"]
        );
    }

    #[test]
    fn high_risk_elderly_gets_icu_recommendation() {
        let features = FeatureVector {
            age: 72.0,
            ..normal_vitals()
        };
        let prediction = Prediction {
            class: RiskClass::HighRisk,
            high_risk_probability: 0.91,
        };
        let assessment = interpret(prediction, &features);
        assert_eq!(assessment.condition, RiskCondition::High);
        assert_eq!(assessment.severity, Severity::Critical);
        assert_eq!(
            assessment.recommendations.last().map(String::as_str),
            Some("Elderly patient: Consider ICU admission")
        );
        assert_eq!(assessment.model_confidence, 0.91);
    }

    #[test]
    fn severe_hypoxemia_forces_critical() {
        let features = FeatureVector {
            oxygen_saturation: 85.0,
            ..normal_vitals()
        };
        let assessment = interpret(low(0.05), &features);
        assert_eq!(assessment.condition, RiskCondition::Low);
        assert_eq!(assessment.severity, Severity::Critical);
        assert!(
            assessment
                .alerts
                .contains(&"CRITICAL: Severe hypoxemia (SpO2 < 90%)".to_string())
        );
    }

    #[test]
    fn out_of_range_vitals_raise_alerts() {
        let features = FeatureVector {
            heart_rate: 120.0,
            systolic_bp: 85.0,
            diastolic_bp: 55.0,
            oxygen_saturation: 93.0,
            body_temperature: 38.4,
            respiratory_rate: 24.0,
            ..normal_vitals()
        };
        let assessment = interpret(low(0.1), &features);
        assert_eq!(
            assessment.alerts,
            vec![
                "Tachycardia: Heart rate > 100 bpm",
                "Hypotension detected",
                "Low oxygen saturation (SpO2 < 95%)",
                "Fever detected (>=38C)",
                "Tachypnea: Respiratory rate > 20",
            ]
        );
        assert_eq!(assessment.severity, Severity::Stable);
    }

    #[test]
    fn unmeasured_vitals_are_not_flagged() {
        let assessment = interpret(low(0.1), &FeatureVector::default());
        assert_eq!(assessment.alerts, vec![NO_ALERTS.to_string()]);
    }
}
