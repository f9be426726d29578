//! Tests for the JSON-file timetable repository.

use std::fs;

use timetable_engine::{
    detect_in, Day, Entry, EntryId, Interval, JsonFileTimetable, TimetableError,
    TimetableRepository,
};

fn entry(id: &str, room: &str, start: &str, end: &str) -> Entry {
    Entry::new(id, "Math", Day::new("Monday"), Interval::parse(start, end).unwrap())
        .with_room(room)
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileTimetable::open(dir.path().join("timetable.json")).unwrap();

    assert!(repo.list().unwrap().is_empty());
    assert!(!repo.path().exists(), "opening must not create the file");
}

#[test]
fn mutations_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");

    {
        let repo = JsonFileTimetable::open(&path).unwrap();
        repo.add(entry("a", "101", "09:00", "10:00")).unwrap();
        repo.add(entry("b", "101", "09:30", "10:30")).unwrap();
        repo.add(entry("c", "202", "11:00", "12:00")).unwrap();
        repo.remove(&EntryId::new("c")).unwrap();
        repo.update(&EntryId::new("b"), entry("b", "102", "09:30", "10:30"))
            .unwrap();
    }

    let reopened = JsonFileTimetable::open(&path).unwrap();
    let entries = reopened.list().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, EntryId::new("a"));
    assert_eq!(entries[1].room.as_deref(), Some("102"));
    assert!(detect_in(&reopened).unwrap().is_empty());
    assert!(!dir.path().join("timetable.json.tmp").exists());
}

#[test]
fn stored_file_is_a_flat_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");
    let repo = JsonFileTimetable::open(&path).unwrap();
    repo.add(entry("a", "101", "09:00", "10:00").with_teacher("Smith"))
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value[0]["id"], "a");
    assert_eq!(value[0]["start"], "09:00");
    assert_eq!(value[0]["end"], "10:00");
    assert_eq!(value[0]["teacher"], "Smith");
    assert!(value[0].get("class_name").is_none());
}

#[test]
fn invalid_stored_interval_is_rejected_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");
    fs::write(
        &path,
        r#"[{"id":"a","subject":"Math","day":"Monday","start":"10:00","end":"09:00"}]"#,
    )
    .unwrap();

    assert!(matches!(
        JsonFileTimetable::open(&path),
        Err(TimetableError::Json(_))
    ));
}

#[test]
fn duplicate_stored_ids_are_rejected_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");
    let raw = serde_json::to_string(&vec![
        entry("a", "101", "09:00", "10:00"),
        entry("a", "102", "11:00", "12:00"),
    ])
    .unwrap();
    fs::write(&path, raw).unwrap();

    assert!(matches!(
        JsonFileTimetable::open(&path),
        Err(TimetableError::DuplicateId(_))
    ));
}

#[test]
fn failed_write_keeps_last_known_good_state() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so every save fails.
    let path = dir.path().join("missing").join("timetable.json");
    let repo = JsonFileTimetable::open(&path).unwrap();

    let result = repo.add(entry("a", "101", "09:00", "10:00"));

    assert!(matches!(result, Err(TimetableError::Io(_))));
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn failed_rename_removes_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");
    let repo = JsonFileTimetable::open(&path).unwrap();
    // A non-empty directory now sits where the file should go, so the rename fails.
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    let result = repo.add(entry("a", "101", "09:00", "10:00"));

    assert!(matches!(result, Err(TimetableError::Io(_))));
    assert!(repo.list().unwrap().is_empty());
    assert!(!dir.path().join("timetable.json.tmp").exists());
}

#[test]
fn rejected_mutation_does_not_touch_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.json");
    let repo = JsonFileTimetable::open(&path).unwrap();
    repo.add(entry("a", "101", "09:00", "10:00")).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(repo.add(entry("a", "999", "13:00", "14:00")).is_err());
    assert!(repo.remove(&EntryId::new("nope")).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(repo.list().unwrap().len(), 1);
}
