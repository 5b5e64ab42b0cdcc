//! Commit-path behavior of the write engine.

mod common;

use std::fs;

use common::{temp_root, test_engine};
use serde_json::Value;
use testyard::engine::backup_path_for;
use testyard::types::rooted::RootedPath;
use testyard::types::request::WriteOptions;

#[test]
fn write_and_append_apply_in_one_batch() {
    let td = temp_root();
    let root = td.path();
    fs::write(root.join("b.txt"), "hello").unwrap();

    let (mut engine, _facts) = test_engine();
    engine.queue_write(
        RootedPath::from_rooted(root, &root.join("a.txt")).unwrap(),
        "hello",
        WriteOptions::default(),
    );
    engine.queue_append(
        RootedPath::from_rooted(root, &root.join("b.txt")).unwrap(),
        "-world",
        WriteOptions::default(),
    );

    let report = engine.flush().expect("flush");
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "hello-world");
    assert_eq!(report.created, vec![root.join("a.txt")]);
    assert_eq!(report.appended, vec![root.join("b.txt")]);
    assert!(report.written.is_empty());
}

#[test]
fn appends_run_before_writes_and_in_enqueue_order() {
    let td = temp_root();
    let root = td.path();
    let target = root.join("notes.txt");
    fs::write(&target, "hello").unwrap();

    let (mut engine, _facts) = test_engine();
    let rooted = RootedPath::from_rooted(root, &target).unwrap();
    // Enqueued first, executed last: writes always follow appends.
    engine.queue_write(rooted.clone(), "fresh", WriteOptions::default());
    engine.queue_append(rooted.clone(), "-one", WriteOptions::default());
    engine.queue_append(rooted, "-two", WriteOptions::default());

    let report = engine.flush().expect("flush");
    assert_eq!(fs::read_to_string(&target).unwrap(), "fresh");
    assert_eq!(report.appended, vec![target.clone(), target.clone()]);
    assert_eq!(report.written, vec![target.clone()]);
    // One path, one backup, gone after commit.
    assert!(!backup_path_for(&target).exists());
}

#[test]
fn append_order_is_enqueue_order() {
    let td = temp_root();
    let root = td.path();
    let target = root.join("log.txt");
    fs::write(&target, "start").unwrap();

    let (mut engine, _facts) = test_engine();
    let rooted = RootedPath::from_rooted(root, &target).unwrap();
    engine.queue_append(rooted.clone(), "-a", WriteOptions::default());
    engine.queue_append(rooted, "-b", WriteOptions::default());

    engine.flush().expect("flush");
    assert_eq!(fs::read_to_string(&target).unwrap(), "start-a-b");
}

#[test]
fn commit_removes_backup_artifacts() {
    let td = temp_root();
    let root = td.path();
    let existing = root.join("manifest.json");
    fs::write(&existing, "{}").unwrap();

    let (mut engine, _facts) = test_engine();
    engine.queue_write(
        RootedPath::from_rooted(root, &existing).unwrap(),
        "{\"name\":\"demo\"}",
        WriteOptions::default(),
    );

    engine.flush().expect("flush");
    assert!(!backup_path_for(&existing).exists());
    let leftovers: Vec<_> = fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn mode_bits_are_applied_after_the_write() {
    use std::os::unix::fs::PermissionsExt as _;

    let td = temp_root();
    let root = td.path();
    let script = root.join("hook.sh");

    let (mut engine, _facts) = test_engine();
    engine.queue_write(
        RootedPath::from_rooted(root, &script).unwrap(),
        "#!/bin/sh\n",
        WriteOptions { mode: Some(0o755) },
    );

    engine.flush().expect("flush");
    let mode = fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn queues_drain_after_flush() {
    let td = temp_root();
    let root = td.path();

    let (mut engine, _facts) = test_engine();
    engine.queue_write(
        RootedPath::from_rooted(root, &root.join("a.txt")).unwrap(),
        "hello",
        WriteOptions::default(),
    );
    assert_eq!(engine.queued(), 1);
    engine.flush().expect("flush");
    assert_eq!(engine.queued(), 0);

    // A second flush is an empty batch, not a replay.
    let report = engine.flush().expect("empty flush");
    assert!(report.created.is_empty());
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");
}

#[test]
fn success_facts_carry_the_envelope() {
    let td = temp_root();
    let root = td.path();

    let (mut engine, facts) = test_engine();
    engine.queue_write(
        RootedPath::from_rooted(root, &root.join("a.txt")).unwrap(),
        "hello",
        WriteOptions::default(),
    );
    engine.flush().expect("flush");

    let events = facts.events.lock().unwrap();
    assert!(events
        .iter()
        .any(|(_, event, decision, _)| event == "flush.attempt" && decision == "success"));
    let summary = events
        .iter()
        .find(|(_, event, decision, fields)| {
            event == "flush.result"
                && decision == "success"
                && fields.get("created") == Some(&Value::from(1))
        })
        .expect("flush.result summary");
    assert!(summary.3.get("batch_id").and_then(Value::as_str).is_some());
    assert!(summary.3.get("schema_version").is_some());
}
