//! Shared data model for the vital-sign ingestion pipeline.
//!
//! - **vital_row**: rows extracted from a monitor export and their annotated form
//! - **metric**: derived-metric failure values and export sentinels
//! - **features**: the fixed 14-slot classifier input
//! - **outcome**: reasons a row or feed line was skipped
//! - **reading**: readings produced by the live feed
//! - **patient**: snapshots and stored patient records
//! - **assessment**: classifier output and its interpretation

pub mod assessment;
pub mod features;
pub mod metric;
pub mod outcome;
pub mod patient;
pub mod reading;
pub mod vital_row;

pub use assessment::{Assessment, Prediction, RiskClass, RiskCondition, Severity};
pub use features::{FeatureName, FeatureVector, feature_names};
pub use metric::{
    ERROR_SENTINEL, HEIGHT_ZERO_SENTINEL, MetricError, MetricResult, PressureSide, render_float,
    render_metric,
};
pub use outcome::SkipReason;
pub use patient::{PatientRecord, PatientSnapshot, VitalSigns};
pub use reading::{DEFAULT_FEED_TEMPERATURE, StreamingReading, UNKNOWN_RHYTHM};
pub use vital_row::{AnnotatedRow, BatchAttributes, EXPORT_COLUMNS, VitalRow};
