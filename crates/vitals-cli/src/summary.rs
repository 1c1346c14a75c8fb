use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vitals_cli::workflow::{FeedReport, ProcessReport};
use vitals_model::{
    Assessment, FeatureVector, MetricResult, PatientRecord, Severity, StreamingReading,
    render_metric,
};

pub fn print_process_summary(report: &ProcessReport, preview: usize) {
    println!("Source: {}", report.source.display());
    println!("Output: {}", report.output.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows kept"),
        header_cell("Rows skipped"),
        header_cell("NIBP errors"),
        header_cell("BMI"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(report.kept).add_attribute(Attribute::Bold),
        count_cell(report.skipped, Color::Yellow),
        count_cell(report.pressure_failures, Color::Red),
        metric_cell(&report.bmi),
    ]);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    println!("{table}");

    if preview == 0 {
        return;
    }
    let mut rows = Table::new();
    rows.set_header(vec![
        header_cell("Time"),
        header_cell("HR"),
        header_cell("SpO2"),
        header_cell("NIBP"),
        header_cell("PP"),
        header_cell("MAP"),
        header_cell("Event"),
    ]);
    apply_table_style(&mut rows);
    for row in report.rows.iter().take(preview) {
        rows.add_row(vec![
            Cell::new(&row.row.time).fg(Color::Blue),
            Cell::new(&row.row.heart_rate),
            Cell::new(&row.row.spo2),
            Cell::new(&row.row.nibp),
            metric_cell(&row.pulse_pressure),
            metric_cell(&row.map),
            text_cell(&row.row.event),
        ]);
    }
    if report.rows.len() > preview {
        println!("First {preview} of {} rows:", report.rows.len());
    }
    println!("{rows}");
}

pub fn print_records(records: &[PatientRecord]) {
    if records.is_empty() {
        println!("No stored records.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Case ID"),
        header_cell("Gender"),
        header_cell("Age"),
        header_cell("Height"),
        header_cell("Weight"),
        header_cell("Temp"),
        header_cell("Risk"),
    ]);
    apply_table_style(&mut table);
    for record in records {
        let risk = match &record.ml_predictions {
            Some(assessment) => severity_cell(assessment.condition.label(), assessment.severity),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&record.case_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            text_cell(&record.gender),
            text_cell(&record.age),
            text_cell(&record.height),
            text_cell(&record.weight),
            text_cell(&record.temperature),
            risk,
        ]);
    }
    println!("{table}");
    println!("{} record(s)", records.len());
}

pub fn print_reading(reading: &StreamingReading) {
    let bp = match (&reading.systolic_bp, &reading.diastolic_bp) {
        (Some(systolic), Some(diastolic)) => format!("{systolic}/{diastolic}"),
        _ => "--".to_string(),
    };
    println!(
        "{}  HR {:>4}  SpO2 {:>4}  etCO2 {:>4}  RR {:>4}  BP {:>7}  {}  {}",
        reading.time,
        reading.heart_rate,
        reading.spo2,
        reading.etco2,
        reading.respiratory_rate,
        bp,
        reading.rhythm,
        reading.event
    );
}

pub fn print_feed_summary(report: &FeedReport) {
    let ending = if report.finished {
        "end of feed"
    } else {
        "stopped"
    };
    println!(
        "{}: {} reading(s), {} skipped line(s), {ending}",
        report.path.display(),
        report.readings,
        report.skipped
    );
}

pub fn print_features(features: &FeatureVector) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Feature"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, value) in features.named_values() {
        let cell = if value == 0.0 {
            dim_cell(value)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    println!("{table}");
}

pub fn print_assessment(assessment: &Assessment) {
    println!(
        "{} ({}), p(high risk) = {}%, confidence {}",
        assessment.condition.label(),
        assessment.risk_class.label(),
        assessment.risk_probability_percent,
        assessment.model_confidence
    );
    let mut table = Table::new();
    table.set_header(vec![header_cell("Alerts"), header_cell("Recommendations")]);
    apply_table_style(&mut table);
    let depth = assessment.alerts.len().max(assessment.recommendations.len());
    for index in 0..depth {
        let alert = assessment
            .alerts
            .get(index)
            .map_or_else(|| Cell::new(""), |alert| severity_cell(alert, assessment.severity));
        let recommendation = assessment
            .recommendations
            .get(index)
            .map_or_else(|| Cell::new(""), Cell::new);
        table.add_row(vec![alert, recommendation]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn metric_cell<T: std::fmt::Display>(value: &MetricResult<T>) -> Cell {
    match value {
        Ok(_) => Cell::new(render_metric(value)),
        Err(_) => Cell::new(render_metric(value)).fg(Color::Red),
    }
}

fn severity_cell(text: &str, severity: Severity) -> Cell {
    match severity {
        Severity::Critical => Cell::new(text)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Monitor => Cell::new(text).fg(Color::Yellow),
        Severity::Stable => Cell::new(text).fg(Color::Green),
    }
}

fn text_cell(value: &str) -> Cell {
    if value.trim().is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
