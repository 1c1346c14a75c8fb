//! Derived clinical metrics: pulse pressure, mean arterial pressure and BMI.
//!
//! All functions are pure. Failures come back as [`MetricError`] values so
//! one bad reading never interrupts a batch.

use vitals_model::{MetricError, MetricResult, PressureSide};

use crate::normalization::{parse_i64, round_half_even};

/// A parsed `systolic/diastolic` pair in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

impl BloodPressure {
    /// Parse a raw NIBP token. Requires exactly one `/` with an integer on each side.
    pub fn parse(raw: &str) -> MetricResult<Self> {
        let mut parts = raw.split('/');
        let (Some(systolic), Some(diastolic)) = (parts.next(), parts.next()) else {
            return Err(MetricError::MissingSeparator);
        };
        if parts.next().is_some() {
            return Err(MetricError::ExtraSeparator);
        }
        let systolic = parse_i64(systolic).ok_or(MetricError::NotInteger {
            side: PressureSide::Systolic,
        })?;
        let diastolic = parse_i64(diastolic).ok_or(MetricError::NotInteger {
            side: PressureSide::Diastolic,
        })?;
        Ok(Self {
            systolic,
            diastolic,
        })
    }

    /// Systolic minus diastolic.
    pub fn pulse_pressure(&self) -> MetricResult<i64> {
        self.systolic
            .checked_sub(self.diastolic)
            .ok_or(MetricError::NotFinite)
    }

    /// Diastolic plus one third of the pulse pressure, rounded half-to-even.
    pub fn mean_arterial_pressure(&self) -> MetricResult<i64> {
        let pulse_pressure = self.pulse_pressure()?;
        let third = round_half_even(pulse_pressure as f64 / 3.0) as i64;
        self.diastolic
            .checked_add(third)
            .ok_or(MetricError::NotFinite)
    }
}

/// Pulse pressure from a raw NIBP token.
pub fn pulse_pressure(nibp: &str) -> MetricResult<i64> {
    BloodPressure::parse(nibp)?.pulse_pressure()
}

/// Mean arterial pressure from a raw NIBP token.
pub fn mean_arterial_pressure(nibp: &str) -> MetricResult<i64> {
    BloodPressure::parse(nibp)?.mean_arterial_pressure()
}

/// Mean arterial pressure for fractional pressures, rounded the same way.
pub fn mean_arterial_pressure_f64(systolic: f64, diastolic: f64) -> MetricResult<f64> {
    let map = diastolic + round_half_even((systolic - diastolic) / 3.0);
    if map.is_finite() {
        Ok(map)
    } else {
        Err(MetricError::NotFinite)
    }
}

/// Body-mass index: weight in kg over height in metres squared.
///
/// A non-positive height is [`MetricError::HeightNotPositive`]; any other
/// non-finite result is [`MetricError::NotFinite`].
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> MetricResult<f64> {
    if height_m <= 0.0 {
        return Err(MetricError::HeightNotPositive);
    }
    let bmi = weight_kg / height_m.powi(2);
    if bmi.is_finite() {
        Ok(bmi)
    } else {
        Err(MetricError::NotFinite)
    }
}
