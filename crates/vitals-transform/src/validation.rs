//! Submission validation.
//!
//! Checks run before any export, persistence or classifier call.

use vitals_model::{BatchAttributes, PatientSnapshot};

use crate::error::{Result, ValidationError};
use crate::normalization::parse_f64;

/// Parse the per-visit weight (kg), height (m) and temperature (°C).
///
/// All three are required and must be numbers. Height is not range-checked
/// here; a non-positive height only marks BMI as failed.
pub fn parse_batch_attributes(
    weight_kg: &str,
    height_m: &str,
    temperature_c: &str,
) -> Result<BatchAttributes> {
    Ok(BatchAttributes {
        weight_kg: required_number("Weight", weight_kg)?,
        height_m: required_number("Height", height_m)?,
        temperature_c: required_number("Temperature", temperature_c)?,
    })
}

/// Check that the fields the classifier depends on were provided.
///
/// Temperature may come from the snapshot itself or its vital-sign block.
pub fn validate_snapshot_for_assessment(snapshot: &PatientSnapshot) -> Result<()> {
    required("Age", &snapshot.age)?;
    required("Height", &snapshot.height)?;
    required("Weight", &snapshot.weight)?;
    if snapshot.temperature.trim().is_empty() {
        required("Temperature", &snapshot.vital_signs.temperature)?;
    }
    Ok(())
}

/// A non-empty case identifier.
pub fn require_case_id(case_id: &str) -> Result<&str> {
    required("Case ID", case_id)?;
    Ok(case_id.trim())
}

fn required(field: &'static str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(())
    }
}

fn required_number(field: &'static str, raw: &str) -> Result<f64> {
    required(field, raw)?;
    parse_f64(raw).ok_or_else(|| ValidationError::NotNumeric {
        field,
        value: raw.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_attributes_parse() {
        let attrs = parse_batch_attributes("80", " 1.75 ", "37.0").expect("valid");
        assert_eq!(attrs.weight_kg, 80.0);
        assert_eq!(attrs.height_m, 1.75);
        assert_eq!(attrs.temperature_c, 37.0);
    }

    #[test]
    fn batch_attributes_reject_missing_and_garbage() {
        assert_eq!(
            parse_batch_attributes("", "1.75", "37"),
            Err(ValidationError::Missing { field: "Weight" })
        );
        assert_eq!(
            parse_batch_attributes("80", "tall", "37"),
            Err(ValidationError::NotNumeric {
                field: "Height",
                value: "tall".to_string()
            })
        );
        assert_eq!(
            parse_batch_attributes("80", "1.75", "  "),
            Err(ValidationError::Missing {
                field: "Temperature"
            })
        );
    }

    #[test]
    fn snapshot_requirements() {
        let mut snapshot = PatientSnapshot {
            age: "45".to_string(),
            height: "170".to_string(),
            weight: "70".to_string(),
            ..PatientSnapshot::default()
        };
        assert_eq!(
            validate_snapshot_for_assessment(&snapshot),
            Err(ValidationError::Missing {
                field: "Temperature"
            })
        );
        snapshot.vital_signs.temperature = "36.9".to_string();
        assert_eq!(validate_snapshot_for_assessment(&snapshot), Ok(()));

        snapshot.age.clear();
        assert_eq!(
            validate_snapshot_for_assessment(&snapshot),
            Err(ValidationError::Missing { field: "Age" })
        );
    }

    #[test]
    fn case_id_is_trimmed() {
        assert_eq!(require_case_id(" CASE-1 "), Ok("CASE-1"));
        assert_eq!(
            require_case_id(""),
            Err(ValidationError::Missing { field: "Case ID" })
        );
    }
}
