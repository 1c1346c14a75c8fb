//! Tab-separated feed line parsing.
//!
//! Columns: `Time, HR, SpO2, etCO2, RR, NIBP, Rhythm, Event`. Rhythm and
//! Event are optional. An optional header line starts with `Time`.

use std::time::Duration;

use chrono::Local;
use vitals_model::{SkipReason, StreamingReading, UNKNOWN_RHYTHM};

/// Minimum number of tab-separated fields in a data line.
pub const REQUIRED_FIELDS: usize = 6;

const HEADER_PREFIX: &str = "Time";

/// Result of parsing one feed line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Reading(StreamingReading),
    Skipped(SkipReason),
}

impl LineOutcome {
    pub fn into_reading(self) -> Option<StreamingReading> {
        match self {
            Self::Reading(reading) => Some(reading),
            Self::Skipped(_) => None,
        }
    }
}

/// Parse one feed line, stamping it with the current local time.
///
/// Blood pressure is split on the first `/`; without one, systolic and
/// diastolic stay `None` rather than becoming zero.
pub fn parse_line(line: &str, temperature: &str) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Skipped(SkipReason::Blank);
    }
    if line.starts_with(HEADER_PREFIX) {
        return LineOutcome::Skipped(SkipReason::Header);
    }

    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return LineOutcome::Skipped(SkipReason::TooFewFields {
            found: fields.len(),
            required: REQUIRED_FIELDS,
        });
    }

    let nibp = fields[5];
    let (systolic_bp, diastolic_bp) = match nibp.split_once('/') {
        Some((systolic, rest)) => {
            let diastolic = rest.split('/').next().unwrap_or_default();
            (
                Some(systolic.trim().to_string()),
                Some(diastolic.trim().to_string()),
            )
        }
        None => (None, None),
    };

    LineOutcome::Reading(StreamingReading {
        captured_at: Local::now(),
        time: fields[0].to_string(),
        heart_rate: fields[1].to_string(),
        spo2: fields[2].to_string(),
        etco2: fields[3].to_string(),
        respiratory_rate: fields[4].to_string(),
        systolic_bp,
        diastolic_bp,
        blood_pressure: nibp.to_string(),
        rhythm: fields
            .get(6)
            .map_or_else(|| UNKNOWN_RHYTHM.to_string(), |rhythm| (*rhythm).to_string()),
        event: fields.get(7).map(|event| (*event).to_string()).unwrap_or_default(),
        temperature: temperature.to_string(),
    })
}

/// Seconds since midnight for `MM:SS` or `HH:MM:SS`.
///
/// Feed timestamps with two parts count minutes and seconds. Values too
/// large to represent are unparsable.
pub fn parse_time_to_seconds(time: &str) -> Option<u64> {
    let parts: Vec<u64> = time
        .trim()
        .split(':')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [minutes, seconds] => minutes.checked_mul(60)?.checked_add(*seconds),
        [hours, minutes, seconds] => hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(*seconds),
        _ => None,
    }
}

/// Delay before emitting a reading stamped `current` after one stamped `previous`.
///
/// Uses the feed's own time delta, or `fallback` when either time is unparsable
/// or the delta is not positive.
pub fn playback_delay(previous: &str, current: &str, fallback: Duration) -> Duration {
    match (parse_time_to_seconds(previous), parse_time_to_seconds(current)) {
        (Some(previous), Some(current)) if current > previous => {
            Duration::from_secs(current - previous)
        }
        _ => fallback,
    }
}
