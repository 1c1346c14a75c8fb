//! Snapshot assessment, in place or on a worker thread.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};
use vitals_model::{Assessment, PatientSnapshot};
use vitals_transform::{assemble_features, validate_snapshot_for_assessment};

use crate::classifier::{RiskClassifier, check_schema};
use crate::error::{AssessError, Result};
use crate::interpret::interpret;

/// Assess one snapshot.
///
/// Checks run in order: classifier schema, required inputs, feature
/// assembly. The classifier is only called with a complete vector.
pub fn assess(classifier: &dyn RiskClassifier, snapshot: &PatientSnapshot) -> Result<Assessment> {
    check_schema(&classifier.feature_names())?;
    validate_snapshot_for_assessment(snapshot)?;
    let features = assemble_features(snapshot)?;

    let prediction = classifier.predict(&features)?;
    let probability = prediction.high_risk_probability;
    if !(0.0..=1.0).contains(&probability) {
        return Err(AssessError::InvalidProbability { value: probability });
    }
    debug!(class = prediction.class.label(), "prediction received");

    let assessment = interpret(prediction, &features);
    info!(
        condition = assessment.condition.label(),
        severity = assessment.severity.label(),
        alerts = assessment.alerts.len(),
        "assessment complete"
    );
    Ok(assessment)
}

/// Run [`assess`] on a background thread.
///
/// The receiver yields exactly one result. If the worker cannot be started
/// the error is already waiting in the channel.
pub fn spawn_assessment(
    classifier: Arc<dyn RiskClassifier>,
    snapshot: PatientSnapshot,
) -> Receiver<Result<Assessment>> {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let worker_sender = sender.clone();

    let spawned = std::thread::Builder::new()
        .name("vitals-assess".to_string())
        .spawn(move || {
            let result = assess(classifier.as_ref(), &snapshot);
            if worker_sender.send(result).is_err() {
                debug!("assessment result dropped; receiver gone");
            }
        });

    if let Err(source) = spawned {
        warn!(%source, "assessment worker failed to start");
        let result = Err(AssessError::WorkerUnavailable {
            source: Some(source),
        });
        if sender.send(result).is_err() {
            debug!("assessment failure dropped; receiver gone");
        }
    }
    receiver
}
