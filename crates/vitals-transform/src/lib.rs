//! Derived metrics and record shaping for extracted vital signs.
//!
//! - **metrics**: pulse pressure, mean arterial pressure and BMI
//! - **annotate**: batch annotation of extracted rows
//! - **features**: classifier feature vector for a single snapshot
//! - **validation**: required-field checks on user submissions

pub mod annotate;
pub mod error;
pub mod features;
pub mod metrics;
pub mod normalization;
pub mod validation;

pub use annotate::{annotate_rows, count_pressure_failures};
pub use error::{FeatureError, Result, ValidationError};
pub use features::{assemble_features, patient_id_from_case};
pub use metrics::{
    BloodPressure, body_mass_index, mean_arterial_pressure, mean_arterial_pressure_f64,
    pulse_pressure,
};
pub use validation::{parse_batch_attributes, require_case_id, validate_snapshot_for_assessment};
