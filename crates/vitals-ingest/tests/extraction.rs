//! End-to-end tests for export normalization and row extraction.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use vitals_ingest::{ExtractOutcome, IngestError, extract_rows, read_export};
use vitals_model::SkipReason;

const MONITOR_EXPORT: &str = r"{\rtf1\ansi\ansicpg1252\deff0{\fonttbl{\f0\fswiss Arial;}}
{\*\generator Monitor Export 2.1;}\viewkind4\uc1\pard\f0\fs20
Time\tab HR\tab SpO2\tab etCO2\tab RR\tab NIBP\tab Rhythm\tab Event\par
00:00\tab 78\tab 98\tab 36\tab 14\tab 122/81\tab Sinus\tab \par
00:01\tab 96\tab 94\tab 38\tab 18\tab 131/85\tab Sinus\tab Fluid bolus\par
00:02\tab 104\tab 91\par
00:03\tab 88\tab 97\tab 35\tab 15\tab --\tab AFib\tab Rate control\tab started\par
}";

fn write_export(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write export");
    path
}

#[test]
fn rtf_export_yields_rows_in_document_order() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_export(&dir, "case.rtf", MONITOR_EXPORT.as_bytes());

    let text = read_export(&path).expect("read export");
    let extraction = extract_rows(&text);
    let rows: Vec<_> = extraction.rows().collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].time, "00:00");
    assert_eq!(rows[0].event, "");
    assert_eq!(rows[1].nibp, "131/85");
    assert_eq!(rows[1].event, "Fluid bolus");
    assert_eq!(rows[2].time, "00:03");
    assert_eq!(rows[2].nibp, "--");
    assert_eq!(rows[2].rhythm, "AFib");
    assert_eq!(rows[2].event, "Rate control started");

    assert_eq!(extraction.skipped_count(), 1);
    assert!(extraction.outcomes.contains(&ExtractOutcome::Skipped {
        time: "00:02".to_string(),
        reason: SkipReason::IncompleteRow,
    }));
}

#[test]
fn extraction_is_deterministic() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_export(&dir, "case.rtf", MONITOR_EXPORT.as_bytes());

    let first = extract_rows(&read_export(&path).expect("read"));
    let second = extract_rows(&read_export(&path).expect("read"));
    assert_eq!(first, second);
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_export(&dir, "broken.rtf", &[0x7b, 0x5c, 0xff, 0xfe, 0x00]);

    let err = read_export(&path).expect_err("decode should fail");
    assert!(matches!(err, IngestError::Decode { .. }));
}

#[test]
fn missing_export_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_export(&dir.path().join("missing.rtf")).expect_err("read should fail");
    match err {
        IngestError::Read { path, .. } => assert!(path.ends_with("missing.rtf")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn table_without_rows_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_export(
        &dir,
        "empty.rtf",
        br"{\rtf1 Time\tab HR\tab SpO2\tab etCO2\tab RR\tab NIBP\tab Rhythm\tab Event\par}",
    );
    let extraction = extract_rows(&read_export(&path).expect("read"));
    assert!(extraction.is_empty());
    assert!(extraction.outcomes.is_empty());
}
