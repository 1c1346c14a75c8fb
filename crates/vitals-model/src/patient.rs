//! Patient snapshots and stored records.
//!
//! Values arrive as form text, so every field is a string. JSON numbers are
//! accepted too and kept in their textual form.

use serde::{Deserialize, Deserializer, Serialize};

use crate::assessment::Assessment;
use crate::reading::StreamingReading;

/// A single vital-sign reading as entered or fetched for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalSigns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub heart_rate: String,
    #[serde(deserialize_with = "lenient_string")]
    pub systolic_bp: String,
    #[serde(deserialize_with = "lenient_string")]
    pub diastolic_bp: String,
    #[serde(deserialize_with = "lenient_string")]
    pub spo2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub respiratory_rate: String,
    #[serde(deserialize_with = "lenient_string")]
    pub temperature: String,
}

impl VitalSigns {
    /// Copy the fields a feed reading provides. Missing blood pressure stays empty.
    pub fn from_reading(reading: &StreamingReading) -> Self {
        Self {
            timestamp: Some(reading.captured_at.to_rfc3339()),
            heart_rate: reading.heart_rate.clone(),
            systolic_bp: reading.systolic_bp.clone().unwrap_or_default(),
            diastolic_bp: reading.diastolic_bp.clone().unwrap_or_default(),
            spo2: reading.spo2.clone(),
            respiratory_rate: reading.respiratory_rate.clone(),
            temperature: reading.temperature.clone(),
        }
    }
}

/// Demographics plus one vital-sign reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSnapshot {
    #[serde(deserialize_with = "lenient_string")]
    pub case_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    /// Height in centimetres.
    #[serde(deserialize_with = "lenient_string")]
    pub height: String,
    /// Weight in kilograms.
    #[serde(deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_string")]
    pub temperature: String,
    pub vital_signs: VitalSigns,
}

/// One entry of the flat JSON record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub case_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(deserialize_with = "lenient_string")]
    pub height: String,
    #[serde(deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_string")]
    pub temperature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_predictions: Option<Assessment>,
}

impl PatientRecord {
    /// Build a record from a snapshot, keeping its vital signs.
    pub fn from_snapshot(snapshot: &PatientSnapshot) -> Self {
        Self {
            case_id: snapshot.case_id.clone(),
            gender: snapshot.gender.clone(),
            age: snapshot.age.clone(),
            height: snapshot.height.clone(),
            weight: snapshot.weight.clone(),
            temperature: snapshot.temperature.clone(),
            vital_signs: Some(snapshot.vital_signs.clone()),
            ml_predictions: None,
        }
    }

    /// Attach an assessment to be stored alongside the record.
    #[must_use]
    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        self.ml_predictions = Some(assessment);
        self
    }
}

/// Accept a JSON string, number, bool or null as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Null,
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(text) => text,
        Loose::Int(value) => value.to_string(),
        Loose::Float(value) => value.to_string(),
        Loose::Bool(value) => value.to_string(),
        Loose::Null => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accepts_numbers_and_missing_fields() {
        let json = r#"{
            "case_id": "CASE-1234",
            "gender": "Female",
            "age": 45,
            "height": "160",
            "vital_signs": {"systolic_bp": 110, "diastolic_bp": "70", "temperature": 36.6}
        }"#;
        let snapshot: PatientSnapshot = serde_json::from_str(json).expect("parse snapshot");
        assert_eq!(snapshot.age, "45");
        assert_eq!(snapshot.weight, "");
        assert_eq!(snapshot.vital_signs.systolic_bp, "110");
        assert_eq!(snapshot.vital_signs.temperature, "36.6");
        assert_eq!(snapshot.vital_signs.heart_rate, "");
    }

    #[test]
    fn record_omits_absent_sections() {
        let record = PatientRecord {
            case_id: "CASE-1".to_string(),
            ..PatientRecord::default()
        };
        let json = serde_json::to_value(&record).expect("serialize record");
        assert!(json.get("vital_signs").is_none());
        assert!(json.get("ml_predictions").is_none());
        assert_eq!(json["case_id"], "CASE-1");
    }

    #[test]
    fn null_fields_become_empty_text() {
        let record: PatientRecord =
            serde_json::from_str(r#"{"case_id": "CASE-2", "age": null}"#).expect("parse");
        assert_eq!(record.age, "");
    }
}
