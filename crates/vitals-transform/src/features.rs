//! Single-reading feature assembly.
//!
//! Turns one [`PatientSnapshot`] into the 14-slot [`FeatureVector`] the risk
//! classifier expects. Absent or blank inputs become zero; text that is
//! present but not a number is a [`FeatureError`].

use tracing::debug;
use vitals_model::{FeatureVector, PatientSnapshot};

use crate::error::FeatureError;
use crate::metrics::{body_mass_index, mean_arterial_pressure_f64};
use crate::normalization::parse_f64;

/// Build the classifier input for one snapshot.
///
/// Height is given in centimetres and converted to metres. BMI falls back to
/// zero when height is not positive, since the vector never carries gaps.
/// Body temperature comes from the vital-sign block, or the snapshot itself
/// when the block has none.
pub fn assemble_features(snapshot: &PatientSnapshot) -> Result<FeatureVector, FeatureError> {
    let vitals = &snapshot.vital_signs;

    let age = numeric_or_zero("age", &snapshot.age)?;
    let height_m = numeric_or_zero("height", &snapshot.height)? / 100.0;
    let weight_kg = numeric_or_zero("weight", &snapshot.weight)?;
    let heart_rate = numeric_or_zero("heart_rate", &vitals.heart_rate)?;
    let systolic_bp = numeric_or_zero("systolic_bp", &vitals.systolic_bp)?;
    let diastolic_bp = numeric_or_zero("diastolic_bp", &vitals.diastolic_bp)?;
    let oxygen_saturation = numeric_or_zero("spo2", &vitals.spo2)?;
    let respiratory_rate = numeric_or_zero("respiratory_rate", &vitals.respiratory_rate)?;
    let temperature = if vitals.temperature.trim().is_empty() {
        &snapshot.temperature
    } else {
        &vitals.temperature
    };
    let body_temperature = numeric_or_zero("temperature", temperature)?;

    let bmi = body_mass_index(weight_kg, height_m).unwrap_or(0.0);
    let map = mean_arterial_pressure_f64(systolic_bp, diastolic_bp)
        .map_err(|_| FeatureError::NotFinite { field: "map" })?;

    let vector = FeatureVector {
        patient_id: patient_id_from_case(&snapshot.case_id),
        heart_rate,
        respiratory_rate,
        body_temperature,
        oxygen_saturation,
        systolic_bp,
        diastolic_bp,
        age,
        weight_kg,
        height_m,
        pulse_pressure: systolic_bp - diastolic_bp,
        bmi,
        map,
        gender_male: u8::from(is_male(&snapshot.gender)),
    };
    debug!(patient_id = vector.patient_id, "features assembled");
    Ok(vector)
}

/// Numeric identifier made of the digit characters in a case id.
///
/// `"CASE-1234"` gives 1234. No digits, or more digits than fit, gives 0.
pub fn patient_id_from_case(case_id: &str) -> i64 {
    let digits: String = case_id.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn is_male(gender: &str) -> bool {
    gender.trim().eq_ignore_ascii_case("male")
}

fn numeric_or_zero(field: &'static str, raw: &str) -> Result<f64, FeatureError> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    let value = parse_f64(raw).ok_or_else(|| FeatureError::NotNumeric {
        field,
        value: raw.to_string(),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FeatureError::NotFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_model::{FeatureName, VitalSigns};

    fn snapshot() -> PatientSnapshot {
        PatientSnapshot {
            case_id: "CASE-0042".to_string(),
            gender: "Female".to_string(),
            age: "45".to_string(),
            height: "160".to_string(),
            weight: "60".to_string(),
            temperature: "36.8".to_string(),
            vital_signs: VitalSigns {
                timestamp: None,
                heart_rate: "72".to_string(),
                systolic_bp: "110".to_string(),
                diastolic_bp: "70".to_string(),
                spo2: "98".to_string(),
                respiratory_rate: "16".to_string(),
                temperature: "36.8".to_string(),
            },
        }
    }

    #[test]
    fn reference_snapshot() {
        let vector = assemble_features(&snapshot()).expect("assemble");
        assert_eq!(vector.gender_male, 0);
        assert!((vector.height_m - 1.60).abs() < 1e-12);
        assert_eq!(vector.pulse_pressure, 40.0);
        assert_eq!(vector.map, 83.0);
        assert_eq!(vector.patient_id, 42);
        assert!((vector.bmi - 60.0 / (1.6 * 1.6)).abs() < 1e-9);
        assert_eq!(vector.get(FeatureName::OxygenSaturation), 98.0);
    }

    #[test]
    fn gender_match_is_case_insensitive() {
        for gender in ["male", "MALE", " Male "] {
            let snap = PatientSnapshot {
                gender: gender.to_string(),
                ..snapshot()
            };
            assert_eq!(assemble_features(&snap).expect("assemble").gender_male, 1);
        }
        let snap = PatientSnapshot {
            gender: String::new(),
            ..snapshot()
        };
        assert_eq!(assemble_features(&snap).expect("assemble").gender_male, 0);
    }

    #[test]
    fn empty_inputs_default_to_zero() {
        let vector = assemble_features(&PatientSnapshot::default()).expect("assemble");
        assert_eq!(vector, FeatureVector::default());
    }

    #[test]
    fn patient_id_extraction() {
        assert_eq!(patient_id_from_case("CASE-1234"), 1234);
        assert_eq!(patient_id_from_case("A1B2"), 12);
        assert_eq!(patient_id_from_case("anonymous"), 0);
        assert_eq!(patient_id_from_case("99999999999999999999999"), 0);
    }

    #[test]
    fn garbage_is_a_preprocessing_failure() {
        let mut snap = snapshot();
        snap.vital_signs.heart_rate = "fast".to_string();
        assert_eq!(
            assemble_features(&snap),
            Err(FeatureError::NotNumeric {
                field: "heart_rate",
                value: "fast".to_string()
            })
        );

        let mut snap = snapshot();
        snap.age = "inf".to_string();
        assert_eq!(
            assemble_features(&snap),
            Err(FeatureError::NotFinite { field: "age" })
        );
    }
}
