//! Risk assessment of patient snapshots.
//!
//! - **classifier**: the [`RiskClassifier`] boundary and feature schema check
//! - **logistic**: a JSON-described logistic scorer implementing the boundary
//! - **interpret**: clinical reading of a prediction
//! - **assess**: the full snapshot-to-assessment flow

pub mod assess;
pub mod classifier;
pub mod error;
pub mod interpret;
pub mod logistic;

pub use assess::{assess, spawn_assessment};
pub use classifier::{RiskClassifier, check_schema};
pub use error::{AssessError, ClassifierError, Result};
pub use interpret::{MODERATE_RISK_PROBABILITY, NO_ALERTS, interpret};
pub use logistic::LogisticModel;
