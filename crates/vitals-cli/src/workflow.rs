//! End-to-end flows behind the CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, info_span, trace};
use vitals_assess::{LogisticModel, RiskClassifier, spawn_assessment};
use vitals_ingest::{
    ExtractOutcome, FeedEvent, MonitorOptions, MonitorSession, connect_first, extract_rows,
    read_export,
};
use vitals_model::{
    AnnotatedRow, Assessment, FeatureVector, MetricResult, PatientRecord, PatientSnapshot,
    StreamingReading,
};
use vitals_output::write_processed;
use vitals_transform::{
    annotate_rows, assemble_features, body_mass_index, count_pressure_failures,
    parse_batch_attributes, require_case_id, validate_snapshot_for_assessment,
};

use crate::logging::redact_value;

/// Per-visit values entered alongside an export.
#[derive(Debug, Clone, Default)]
pub struct VisitInput {
    pub weight: String,
    pub height: String,
    pub temperature: String,
}

/// Outcome of processing one export.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub kept: usize,
    pub skipped: usize,
    pub pressure_failures: usize,
    pub bmi: MetricResult<f64>,
    pub rows: Vec<AnnotatedRow>,
}

/// Export → normalize → extract → annotate → `<base>_processed.csv`.
///
/// The visit values are validated before the export is read; an export
/// without a single complete row is an error and writes nothing.
pub fn process_export(source: &Path, visit: &VisitInput) -> Result<ProcessReport> {
    let span = info_span!("process", source = %source.display());
    let _guard = span.enter();

    let attributes = parse_batch_attributes(&visit.weight, &visit.height, &visit.temperature)?;
    let text = read_export(source)?;
    let extraction = extract_rows(&text);

    for outcome in &extraction.outcomes {
        match outcome {
            ExtractOutcome::Kept(row) => trace!(
                time = %row.time,
                heart_rate = redact_value(&row.heart_rate),
                nibp = redact_value(&row.nibp),
                "row kept"
            ),
            ExtractOutcome::Skipped { time, reason } => {
                debug!(%time, %reason, "row skipped");
            }
        }
    }

    let kept = extraction.kept_count();
    let skipped = extraction.skipped_count();
    if kept == 0 {
        bail!(
            "could not parse time-series data from {} ({skipped} incomplete rows)",
            source.display()
        );
    }

    let bmi = body_mass_index(attributes.weight_kg, attributes.height_m);
    let rows = annotate_rows(extraction.into_rows(), attributes);
    let output = write_processed(&rows, source)
        .with_context(|| format!("export rows from {}", source.display()))?;
    let pressure_failures = count_pressure_failures(&rows);
    info!(kept, skipped, output = %output.display(), "export processed");

    Ok(ProcessReport {
        source: source.to_path_buf(),
        output,
        kept,
        skipped,
        pressure_failures,
        bmi,
        rows,
    })
}

/// Record for the visit behind a processed export.
pub fn visit_record(
    case_id: &str,
    gender: &str,
    age: &str,
    visit: &VisitInput,
) -> Result<PatientRecord> {
    let case_id = require_case_id(case_id)?;
    Ok(PatientRecord {
        case_id: case_id.to_string(),
        gender: gender.trim().to_string(),
        age: age.trim().to_string(),
        height: visit.height.trim().to_string(),
        weight: visit.weight.trim().to_string(),
        temperature: visit.temperature.trim().to_string(),
        vital_signs: None,
        ml_predictions: None,
    })
}

/// Record for a patient entered field by field; the assessment inputs must be present.
pub fn snapshot_record(snapshot: &PatientSnapshot) -> Result<PatientRecord> {
    require_case_id(&snapshot.case_id)?;
    validate_snapshot_for_assessment(snapshot)?;
    let mut record = PatientRecord::from_snapshot(snapshot);
    record.case_id = snapshot.case_id.trim().to_string();
    Ok(record)
}

/// Read a patient snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<PatientSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse snapshot {}", path.display()))
}

pub fn load_model(path: &Path) -> Result<Arc<dyn RiskClassifier>> {
    let model = LogisticModel::from_path(path)?;
    Ok(Arc::new(model))
}

/// Feature vector the classifier would receive for `snapshot`.
pub fn snapshot_features(snapshot: &PatientSnapshot) -> Result<FeatureVector> {
    Ok(assemble_features(snapshot)?)
}

/// Assess a snapshot on the worker thread and wait for the result.
pub fn run_assessment(
    classifier: Arc<dyn RiskClassifier>,
    snapshot: PatientSnapshot,
) -> Result<Assessment> {
    let receiver = spawn_assessment(classifier, snapshot);
    let result = receiver
        .recv()
        .map_err(|_| anyhow!("assessment worker exited without a result"))?;
    Ok(result?)
}

/// What a feed watch observed.
#[derive(Debug, Clone)]
pub struct FeedReport {
    pub path: PathBuf,
    pub readings: usize,
    pub skipped: usize,
    /// The feed reached its end rather than the reading limit.
    pub finished: bool,
}

/// Connect to the first available feed and hand each reading to `on_reading`.
///
/// Stops after `limit` readings, when a playback feed ends, or when the
/// worker goes away.
pub fn watch_feed<F>(
    candidates: &[PathBuf],
    options: &MonitorOptions,
    limit: Option<usize>,
    mut on_reading: F,
) -> Result<FeedReport>
where
    F: FnMut(&StreamingReading),
{
    let reader = connect_first(candidates, options)?;
    let path = reader.path().to_path_buf();
    let span = info_span!("feed", path = %path.display());
    let _guard = span.enter();

    let mut session = MonitorSession::new();
    let events = session.start(reader)?;
    let mut report = FeedReport {
        path,
        readings: 0,
        skipped: 0,
        finished: false,
    };

    if limit == Some(0) {
        session.stop();
        return Ok(report);
    }

    while let Ok(event) = events.recv() {
        match event {
            FeedEvent::Reading(reading) => {
                trace!(
                    time = %reading.time,
                    heart_rate = redact_value(&reading.heart_rate),
                    spo2 = redact_value(&reading.spo2),
                    "reading received"
                );
                report.readings += 1;
                on_reading(&reading);
                if limit.is_some_and(|limit| report.readings >= limit) {
                    break;
                }
            }
            FeedEvent::Skipped { line, reason } => {
                debug!(line, %reason, "feed line skipped");
                report.skipped += 1;
            }
            FeedEvent::Finished => {
                report.finished = true;
                break;
            }
        }
    }

    session.stop();
    info!(readings = report.readings, skipped = report.skipped, "feed watch ended");
    Ok(report)
}
