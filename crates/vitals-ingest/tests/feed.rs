//! Tests for the live feed monitor, connection fallback and session handling.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tempfile::TempDir;
use vitals_ingest::{
    FeedEvent, FeedReader, FeedState, IngestError, MonitorMode, MonitorOptions, MonitorSession,
    connect_first,
};
use vitals_model::SkipReason;

const WAIT: Duration = Duration::from_secs(5);

fn write_feed(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write feed");
    path
}

fn fast_options() -> MonitorOptions {
    MonitorOptions::default()
        .with_default_delay(Duration::from_millis(5))
        .with_tail_interval(Duration::from_millis(10))
        .with_stop_poll(Duration::from_millis(5))
}

fn next_event(events: &Receiver<FeedEvent>) -> FeedEvent {
    events.recv_timeout(WAIT).expect("feed event")
}

#[test]
fn playback_emits_readings_and_skips_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_feed(
        &dir,
        "vitalsign_output.txt",
        "Time\tHR\tSpO2\tetCO2\tRR\tNIBP\tRhythm\tEvent\n\
         00:32\t98\t68\t55\t37\t120/80\tSinus\tHR changed\n\
         00:32\t99\t70\t54\t36\t118/79\tSinus\n\
         00:31\t97\t71\n\
         00:30\t96\t72\t53\t35\t--\n",
    );

    let mut reader = FeedReader::new(&path, fast_options());
    assert_eq!(reader.connect().expect("connect"), 5);
    let events = reader.subscribe();
    reader.start().expect("start");
    assert_eq!(reader.state(), FeedState::Monitoring);

    assert_eq!(
        next_event(&events),
        FeedEvent::Skipped {
            line: 1,
            reason: SkipReason::Header
        }
    );
    match next_event(&events) {
        FeedEvent::Reading(reading) => {
            assert_eq!(reading.heart_rate, "98");
            assert_eq!(reading.spo2, "68");
            assert_eq!(reading.systolic_bp.as_deref(), Some("120"));
            assert_eq!(reading.diastolic_bp.as_deref(), Some("80"));
            assert_eq!(reading.event, "HR changed");
        }
        other => panic!("expected reading, got {other:?}"),
    }
    assert!(matches!(next_event(&events), FeedEvent::Reading(_)));
    assert_eq!(
        next_event(&events),
        FeedEvent::Skipped {
            line: 4,
            reason: SkipReason::TooFewFields {
                found: 3,
                required: 6
            }
        }
    );
    match next_event(&events) {
        FeedEvent::Reading(reading) => {
            assert_eq!(reading.systolic_bp, None);
            assert_eq!(reading.rhythm, "Unknown");
        }
        other => panic!("expected reading, got {other:?}"),
    }
    assert_eq!(next_event(&events), FeedEvent::Finished);

    let latest = reader.latest().expect("latest reading");
    assert_eq!(latest.time, "00:30");

    reader.stop();
    assert_eq!(reader.state(), FeedState::Stopped);
    assert!(reader.latest().is_some());
}

#[test]
fn oversized_time_column_paces_with_default_delay() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_feed(
        &dir,
        "vitalsign_output.txt",
        "00:10\t88\t97\t35\t16\t121/79\tSinus\n\
         307445734561825861:00\t89\t97\t35\t16\t121/79\tSinus\n\
         00:12\t90\t97\t35\t16\t121/79\tSinus\n",
    );

    let mut reader = FeedReader::new(&path, fast_options());
    reader.connect().expect("connect");
    let events = reader.subscribe();
    reader.start().expect("start");

    let mut heart_rates = Vec::new();
    loop {
        match next_event(&events) {
            FeedEvent::Reading(reading) => heart_rates.push(reading.heart_rate),
            FeedEvent::Skipped { line, reason } => panic!("line {line} skipped: {reason}"),
            FeedEvent::Finished => break,
        }
    }
    assert_eq!(heart_rates, vec!["88", "89", "90"]);
    assert!(reader.is_finished());
    reader.stop();
}

#[test]
fn stop_ends_emission() {
    let dir = TempDir::new().expect("temp dir");
    let lines: String = (0..200)
        .map(|i| format!("00:00\t{}\t97\t35\t14\t120/80\tSinus\n", 60 + i % 40))
        .collect();
    let path = write_feed(&dir, "long_feed.txt", &lines);

    let options = fast_options().with_default_delay(Duration::from_millis(20));
    let mut reader = FeedReader::new(&path, options);
    reader.connect().expect("connect");
    let events = reader.subscribe();
    reader.start().expect("start");

    assert!(matches!(next_event(&events), FeedEvent::Reading(_)));
    reader.stop();

    while events.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(100));
    assert!(events.try_recv().is_err());
    assert_eq!(reader.state(), FeedState::Stopped);
}

#[test]
fn tail_mode_emits_when_last_line_changes() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_feed(&dir, "tail.txt", "00:01\t80\t97\t35\t14\t120/80\tSinus\n");

    let mut reader = FeedReader::new(&path, fast_options().with_mode(MonitorMode::Tail));
    reader.connect().expect("connect");
    let events = reader.subscribe();
    reader.start().expect("start");

    match next_event(&events) {
        FeedEvent::Reading(reading) => assert_eq!(reading.time, "00:01"),
        other => panic!("expected reading, got {other:?}"),
    }

    let mut file = OpenOptions::new().append(true).open(&path).expect("open feed");
    writeln!(file, "00:02\t82\t96\t36\t15\t118/78\tSinus\tSuction").expect("append");
    drop(file);

    match next_event(&events) {
        FeedEvent::Reading(reading) => {
            assert_eq!(reading.time, "00:02");
            assert_eq!(reading.event, "Suction");
        }
        other => panic!("expected reading, got {other:?}"),
    }

    let mut file = OpenOptions::new().append(true).open(&path).expect("open feed");
    writeln!(file).expect("append blank line");
    drop(file);
    assert_eq!(
        events.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    );

    reader.stop();
    assert_eq!(reader.latest().map(|r| r.time), Some("00:02".to_string()));
}

#[test]
fn connect_first_falls_back_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let present = write_feed(&dir, "simulator_output.txt", "00:01\t80\t97\t35\t14\t120/80\n");
    let candidates = vec![dir.path().join("vitalsign_output.txt"), present.clone()];

    let reader = connect_first(&candidates, &fast_options()).expect("connect");
    assert_eq!(reader.path(), present.as_path());
    assert_eq!(reader.state(), FeedState::Connected);

    let missing = vec![dir.path().join("a.txt"), dir.path().join("b.txt")];
    match connect_first(&missing, &fast_options()) {
        Err(IngestError::NoFeedAvailable { tried }) => assert_eq!(tried, missing),
        other => panic!("expected NoFeedAvailable, got {other:?}"),
    }
}

#[test]
fn session_replaces_previous_feed() {
    let dir = TempDir::new().expect("temp dir");
    let slow: String = (0..100)
        .map(|_| "00:00\t70\t99\t35\t12\t110/70\tSinus\n")
        .collect();
    let first = write_feed(&dir, "first.txt", &slow);
    let second = write_feed(&dir, "second.txt", "00:05\t90\t95\t40\t18\t140/90\tSinus\n");

    let mut session = MonitorSession::new();
    let options = fast_options().with_default_delay(Duration::from_millis(50));
    let first_events = session
        .start(FeedReader::new(&first, options.clone()))
        .expect("start first");
    assert!(matches!(next_event(&first_events), FeedEvent::Reading(_)));

    let second_events = session
        .start(FeedReader::new(&second, options))
        .expect("start second");

    loop {
        match first_events.recv_timeout(WAIT) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => panic!("first feed still running"),
        }
    }

    match next_event(&second_events) {
        FeedEvent::Reading(reading) => assert_eq!(reading.heart_rate, "90"),
        other => panic!("expected reading, got {other:?}"),
    }
    assert_eq!(next_event(&second_events), FeedEvent::Finished);
    assert_eq!(
        session.active().map(FeedReader::path),
        Some(second.as_path())
    );
    assert_eq!(session.latest().map(|r| r.time), Some("00:05".to_string()));

    session.stop();
    assert!(!session.is_monitoring());
    assert!(session.latest().is_some());
}
