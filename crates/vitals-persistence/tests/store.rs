//! Record store flows against real files.

use std::fs;

use serde_json::Value;
use tempfile::tempdir;
use vitals_model::{PatientRecord, PatientSnapshot, VitalSigns};
use vitals_persistence::{PersistenceError, RecordStore};

fn record(case_id: &str) -> PatientRecord {
    PatientRecord::from_snapshot(&PatientSnapshot {
        case_id: case_id.to_string(),
        gender: "Female".to_string(),
        age: "54".to_string(),
        height: "165".to_string(),
        weight: "70".to_string(),
        temperature: "36.9".to_string(),
        vital_signs: VitalSigns {
            heart_rate: "82".to_string(),
            systolic_bp: "128".to_string(),
            diastolic_bp: "84".to_string(),
            spo2: "96".to_string(),
            respiratory_rate: "15".to_string(),
            temperature: "36.9".to_string(),
            ..VitalSigns::default()
        },
    })
}

#[test]
fn append_creates_store_and_lists_in_order() {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("patients.json"));

    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.append(&record("A-1")).unwrap(), 1);
    assert_eq!(store.append(&record("A-2")).unwrap(), 2);

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.case_id).collect();
    assert_eq!(ids, vec!["A-1", "A-2"]);
    assert_eq!(store.find("A-2").unwrap()[0].age, "54");
}

#[test]
fn delete_removes_every_match_and_keeps_unknown_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patients.json");
    fs::write(
        &path,
        r#"[
            {"case_id": "7", "gender": "Male", "ward": "B2"},
            {"case_id": 9, "gender": "Female"},
            {"case_id": "7", "gender": "Male"}
        ]"#,
    )
    .unwrap();
    let store = RecordStore::new(&path);

    assert_eq!(store.delete(" 7 ").unwrap(), 2);
    let remaining: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["case_id"], 9);

    store.append(&record("10")).unwrap();
    assert_eq!(store.delete("9").unwrap(), 1);
    let remaining: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(remaining[0]["case_id"], "10");
}

#[test]
fn unknown_fields_survive_append() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patients.json");
    fs::write(&path, r#"[{"case_id": "1", "ward": "ICU"}]"#).unwrap();

    RecordStore::new(&path).append(&record("2")).unwrap();
    let entries: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(entries[0]["ward"], "ICU");
    assert_eq!(entries[1]["vital_signs"]["heart_rate"], "82");
    assert!(entries[1].get("ml_predictions").is_none());
}

#[test]
fn delete_refuses_blank_and_unknown_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patients.json");
    let store = RecordStore::new(&path);

    assert!(matches!(
        store.delete("   "),
        Err(PersistenceError::Validation(_))
    ));
    assert!(matches!(
        store.delete("404"),
        Err(PersistenceError::CaseNotFound { .. })
    ));
    assert!(!path.exists());

    store.append(&record("1")).unwrap();
    let before = fs::read_to_string(&path).unwrap();
    let err = store.delete("404").unwrap_err();
    assert_eq!(err.to_string(), "No record found for case ID '404'");
    assert!(err.suggestion().is_some());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn corrupt_store_is_not_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patients.json");
    fs::write(&path, "not json").unwrap();
    let store = RecordStore::new(&path);

    let err = store.append(&record("1")).unwrap_err();
    assert!(matches!(err, PersistenceError::Deserialization { .. }));
    assert!(err.user_message().contains("may be corrupted"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}
