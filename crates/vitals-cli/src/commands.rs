use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use vitals_cli::settings::{FeedMode, Settings};
use vitals_cli::workflow::{
    VisitInput, load_model, load_snapshot, process_export, run_assessment, snapshot_features,
    snapshot_record, visit_record, watch_feed,
};
use vitals_persistence::RecordStore;

use crate::cli::{
    AssessArgs, FeedArgs, FeedModeArg, ProcessArgs, RecordAddArgs, RecordDeleteArgs,
    RecordListArgs, SnapshotArgs,
};
use crate::summary::{
    print_assessment, print_feed_summary, print_features, print_process_summary, print_reading,
    print_records,
};

fn record_store(settings: &Settings, explicit: Option<&PathBuf>) -> RecordStore {
    RecordStore::new(explicit.unwrap_or(&settings.store.path))
}

pub fn run_process(args: &ProcessArgs, settings: &Settings) -> Result<()> {
    let visit = VisitInput {
        weight: args.weight.clone(),
        height: args.height.clone(),
        temperature: args.temperature.clone(),
    };
    // Refuse a bad case ID before anything is written.
    let record = args
        .case_id
        .as_deref()
        .map(|case_id| visit_record(case_id, &args.gender, &args.age, &visit))
        .transpose()?;

    let report = process_export(&args.export, &visit)?;
    print_process_summary(&report, args.preview);

    if let Some(record) = record {
        let store = record_store(settings, args.store.as_ref());
        let count = store
            .append(&record)
            .with_context(|| format!("store visit for case {}", record.case_id))?;
        println!(
            "Stored case {} in {} ({count} records)",
            record.case_id,
            store.path().display()
        );
    }
    Ok(())
}

pub fn run_record_add(args: &RecordAddArgs, settings: &Settings) -> Result<()> {
    let snapshot = args.patient.to_snapshot();
    let mut record = snapshot_record(&snapshot)?;

    if let Some(model_path) = &args.model {
        let classifier = load_model(model_path)?;
        let assessment = run_assessment(classifier, snapshot)?;
        print_assessment(&assessment);
        record = record.with_assessment(assessment);
    }

    let store = record_store(settings, args.store.as_ref());
    let count = store.append(&record)?;
    info!(case_id = %record.case_id, count, "patient stored");
    println!(
        "Stored case {} in {} ({count} records)",
        record.case_id,
        store.path().display()
    );
    Ok(())
}

pub fn run_record_list(args: &RecordListArgs, settings: &Settings) -> Result<()> {
    let store = record_store(settings, args.store.as_ref());
    let records = match &args.case_id {
        Some(case_id) => store.find(case_id)?,
        None => store.list()?,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
    }
    Ok(())
}

pub fn run_record_delete(args: &RecordDeleteArgs, settings: &Settings) -> Result<()> {
    let store = record_store(settings, args.store.as_ref());
    let removed = store.delete(&args.case_id)?;
    println!(
        "Deleted {removed} record(s) for case {} from {}",
        args.case_id.trim(),
        store.path().display()
    );
    Ok(())
}

pub fn run_feed(args: &FeedArgs, settings: &Settings) -> Result<()> {
    let mut feed = settings.feed.clone();
    if !args.files.is_empty() {
        feed.candidates.clone_from(&args.files);
    }
    if let Some(mode) = args.mode {
        feed.mode = match mode {
            FeedModeArg::Playback => FeedMode::Playback,
            FeedModeArg::Tail => FeedMode::Tail,
        };
    }
    let temperature = args
        .temperature
        .as_deref()
        .unwrap_or(&settings.defaults.temperature);
    let mut options = feed.monitor_options(temperature);
    if let Some(delay) = args.delay_ms {
        options = options.with_default_delay(Duration::from_millis(delay));
    }

    let report = watch_feed(&feed.candidates, &options, args.count, print_reading)?;
    print_feed_summary(&report);
    Ok(())
}

pub fn run_features(args: &SnapshotArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let features = snapshot_features(&snapshot)?;
    print_features(&features);
    Ok(())
}

pub fn run_assess(args: &AssessArgs, settings: &Settings) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    // Validate the record first so a refused save never follows a prediction.
    let record = if args.save {
        Some(snapshot_record(&snapshot)?)
    } else {
        None
    };

    let classifier = load_model(&args.model)?;
    let assessment = run_assessment(classifier, snapshot)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print_assessment(&assessment);
    }

    if let Some(record) = record {
        let store = record_store(settings, args.store.as_ref());
        let count = store.append(&record.with_assessment(assessment))?;
        println!("Stored assessment in {} ({count} records)", store.path().display());
    }
    Ok(())
}
