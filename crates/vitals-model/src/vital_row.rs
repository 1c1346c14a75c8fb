//! Time-series rows recovered from a monitor export.

use serde::{Deserialize, Serialize};

use crate::metric::{MetricResult, render_float, render_metric};

/// Column headers of an annotated export, in write order.
pub const EXPORT_COLUMNS: [&str; 14] = [
    "Time",
    "HR",
    "SpO2",
    "etCO2",
    "RR",
    "NIBP",
    "Rhythm",
    "Event",
    "Weight(kg)",
    "Height(m)",
    "Temp(C)",
    "BMI",
    "PP",
    "MAP",
];

/// One time-stamped observation extracted from a rich-text table.
///
/// Numeric fields are kept as the raw tokens found in the document; nothing
/// is validated at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalRow {
    /// `HH:MM` timestamp.
    pub time: String,
    pub heart_rate: String,
    pub spo2: String,
    pub etco2: String,
    pub respiratory_rate: String,
    /// Raw `systolic/diastolic` token.
    pub nibp: String,
    pub rhythm: String,
    /// Free text up to the next timestamp; may be empty.
    pub event: String,
}

/// Static per-visit attributes shared by every row of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchAttributes {
    pub weight_kg: f64,
    pub height_m: f64,
    pub temperature_c: f64,
}

/// A [`VitalRow`] extended with batch attributes and derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub row: VitalRow,
    pub weight_kg: f64,
    pub height_m: f64,
    pub temperature_c: f64,
    pub bmi: MetricResult<f64>,
    pub pulse_pressure: MetricResult<i64>,
    pub map: MetricResult<i64>,
}

impl AnnotatedRow {
    /// Field values in [`EXPORT_COLUMNS`] order, with failed metrics rendered as sentinels.
    pub fn export_values(&self) -> [String; 14] {
        [
            self.row.time.clone(),
            self.row.heart_rate.clone(),
            self.row.spo2.clone(),
            self.row.etco2.clone(),
            self.row.respiratory_rate.clone(),
            self.row.nibp.clone(),
            self.row.rhythm.clone(),
            self.row.event.clone(),
            render_float(self.weight_kg),
            render_float(self.height_m),
            render_float(self.temperature_c),
            self.bmi
                .as_ref()
                .map_or_else(|err| err.sentinel().to_string(), |bmi| render_float(*bmi)),
            render_metric(&self.pulse_pressure),
            render_metric(&self.map),
        ]
    }

    /// Column/value pairs in insertion order.
    pub fn export_fields(&self) -> Vec<(&'static str, String)> {
        EXPORT_COLUMNS.into_iter().zip(self.export_values()).collect()
    }
}
