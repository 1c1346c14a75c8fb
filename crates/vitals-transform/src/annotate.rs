//! Batch annotation: merge per-visit attributes and derived metrics into every row.

use tracing::{debug, info};
use vitals_model::{AnnotatedRow, BatchAttributes, MetricResult, VitalRow};

use crate::metrics::{BloodPressure, body_mass_index};

/// Annotate a batch of extracted rows.
///
/// The output has the same length and order as the input. BMI depends only on
/// the batch attributes and is computed once; pulse pressure and MAP are
/// computed per row from that row's NIBP token. A row whose NIBP does not
/// parse keeps its place with both pressure metrics set to the parse error.
pub fn annotate_rows(rows: Vec<VitalRow>, attributes: BatchAttributes) -> Vec<AnnotatedRow> {
    let bmi = body_mass_index(attributes.weight_kg, attributes.height_m);
    let mut failed = 0usize;

    let annotated: Vec<AnnotatedRow> = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let (pulse_pressure, map) = pressure_metrics(&row.nibp);
            if let Err(reason) = &pulse_pressure {
                failed += 1;
                debug!(row = index, %reason, "blood pressure metrics unavailable");
            }
            AnnotatedRow {
                row,
                weight_kg: attributes.weight_kg,
                height_m: attributes.height_m,
                temperature_c: attributes.temperature_c,
                bmi,
                pulse_pressure,
                map,
            }
        })
        .collect();

    info!(
        rows = annotated.len(),
        pressure_failures = failed,
        bmi_available = bmi.is_ok(),
        "batch annotated"
    );
    annotated
}

fn pressure_metrics(nibp: &str) -> (MetricResult<i64>, MetricResult<i64>) {
    match BloodPressure::parse(nibp) {
        Ok(bp) => (bp.pulse_pressure(), bp.mean_arterial_pressure()),
        Err(err) => (Err(err), Err(err)),
    }
}

/// Number of rows whose pressure metrics could not be computed.
pub fn count_pressure_failures(rows: &[AnnotatedRow]) -> usize {
    rows.iter().filter(|row| row.pulse_pressure.is_err()).count()
}
