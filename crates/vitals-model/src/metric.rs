//! Derived-metric failure values.
//!
//! A derived metric (pulse pressure, MAP, BMI) either holds a value or a
//! [`MetricError`] naming why its precondition failed. The plain-text sentinels
//! used by tabular exports are produced only through [`MetricError::sentinel`]
//! and [`render_metric`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel written for any failed derived metric.
pub const ERROR_SENTINEL: &str = "Error";

/// Sentinel written when BMI is requested with a non-positive height.
pub const HEIGHT_ZERO_SENTINEL: &str = "Error: Height zero";

/// Why a derived metric could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricError {
    /// Blood-pressure text had no `/` separator.
    #[error("blood pressure has no '/' separator")]
    MissingSeparator,
    /// Blood-pressure text had more than one `/` separator.
    #[error("blood pressure has more than one '/' separator")]
    ExtraSeparator,
    /// One side of the blood-pressure pair was not an integer.
    #[error("blood pressure {side} is not an integer")]
    NotInteger { side: PressureSide },
    /// Height was zero or negative.
    #[error("height must be greater than zero")]
    HeightNotPositive,
    /// Arithmetic produced a non-finite or out-of-range value.
    #[error("calculation produced a non-finite value")]
    NotFinite,
}

/// Which half of a `systolic/diastolic` pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureSide {
    Systolic,
    Diastolic,
}

impl Display for PressureSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Systolic => f.write_str("systolic"),
            Self::Diastolic => f.write_str("diastolic"),
        }
    }
}

impl MetricError {
    /// Plain-text sentinel used at the export/display boundary.
    pub const fn sentinel(&self) -> &'static str {
        match self {
            Self::HeightNotPositive => HEIGHT_ZERO_SENTINEL,
            _ => ERROR_SENTINEL,
        }
    }
}

/// Result of a derived-metric computation.
pub type MetricResult<T> = Result<T, MetricError>;

/// Render a metric for a text export: the value on success, the sentinel on failure.
pub fn render_metric<T: Display>(value: &MetricResult<T>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(err) => err.sentinel().to_string(),
    }
}

/// Render a float the way the source export wrote it: whole numbers keep `.0`.
pub fn render_float(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_error_has_its_own_sentinel() {
        assert_eq!(MetricError::HeightNotPositive.sentinel(), "Error: Height zero");
        assert_eq!(MetricError::MissingSeparator.sentinel(), "Error");
        assert_eq!(
            MetricError::NotInteger {
                side: PressureSide::Diastolic
            }
            .sentinel(),
            "Error"
        );
    }

    #[test]
    fn render_metric_uses_value_or_sentinel() {
        let ok: MetricResult<i64> = Ok(83);
        let err: MetricResult<i64> = Err(MetricError::NotFinite);
        assert_eq!(render_metric(&ok), "83");
        assert_eq!(render_metric(&err), "Error");
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(render_float(80.0), "80.0");
        assert_eq!(render_float(1.75), "1.75");
        assert_eq!(render_float(80.0 / 1.75f64.powi(2)), "26.122448979591837");
    }

    #[test]
    fn not_integer_message_names_side() {
        let err = MetricError::NotInteger {
            side: PressureSide::Systolic,
        };
        assert_eq!(err.to_string(), "blood pressure systolic is not an integer");
    }
}
