//! Readings produced by the live feed.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Temperature attached to every feed reading; the feed carries none.
pub const DEFAULT_FEED_TEMPERATURE: &str = "37.0";

/// Rhythm reported when a feed line has no rhythm column.
pub const UNKNOWN_RHYTHM: &str = "Unknown";

/// One normalized line of the tab-separated vitals feed.
///
/// `systolic_bp` and `diastolic_bp` are `None` when the blood-pressure column
/// had no `/`; "not provided" is never collapsed into zero.
///
/// Equality ignores `captured_at`: two readings parsed from the same line at
/// different moments compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingReading {
    pub captured_at: DateTime<Local>,
    pub time: String,
    pub heart_rate: String,
    pub spo2: String,
    pub etco2: String,
    pub respiratory_rate: String,
    pub systolic_bp: Option<String>,
    pub diastolic_bp: Option<String>,
    /// Raw blood-pressure column.
    pub blood_pressure: String,
    pub rhythm: String,
    pub event: String,
    pub temperature: String,
}

impl PartialEq for StreamingReading {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
            && self.heart_rate == other.heart_rate
            && self.spo2 == other.spo2
            && self.etco2 == other.etco2
            && self.respiratory_rate == other.respiratory_rate
            && self.systolic_bp == other.systolic_bp
            && self.diastolic_bp == other.diastolic_bp
            && self.blood_pressure == other.blood_pressure
            && self.rhythm == other.rhythm
            && self.event == other.event
            && self.temperature == other.temperature
    }
}
