//! Property-based tests for conflict detection using proptest.
//!
//! These tests verify invariants that should hold for *any* timetable, not
//! just the hand-picked cases in `conflict_tests.rs`.

use proptest::prelude::*;
use timetable_engine::{detect_conflicts, overlaps, Day, Entry, Interval, TimeOfDay};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A valid interval somewhere between 07:00 and 20:00.
fn arb_interval() -> impl Strategy<Value = Interval> {
    (7u16 * 60..20 * 60, 1u16..=180).prop_map(|(start, len)| {
        let end = (start + len).min(20 * 60);
        Interval::new(
            TimeOfDay::from_minutes(start).unwrap(),
            TimeOfDay::from_minutes(end).unwrap(),
        )
        .unwrap()
    })
}

fn arb_day() -> impl Strategy<Value = Day> {
    prop_oneof![
        Just(Day::new("Monday")),
        Just(Day::new("Tuesday")),
        Just(Day::new("Wednesday")),
    ]
}

/// Small resource pools so that matches actually happen, including blanks.
fn arb_resource() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("101".to_string())),
        Just(Some("Lab1".to_string())),
        Just(Some("lab1".to_string())),
    ]
}

fn arb_entries(max: usize) -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        (arb_day(), arb_interval(), arb_resource(), arb_resource(), arb_resource()),
        0..max,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (day, interval, room, teacher, class_name))| {
                let mut e = Entry::new(format!("e{}", i), format!("Subject {}", i), day, interval);
                e.room = room;
                e.teacher = teacher;
                e.class_name = class_name;
                e
            })
            .collect()
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: overlap is symmetric
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric(x in arb_interval(), y in arb_interval()) {
        prop_assert_eq!(overlaps(&x, &y), overlaps(&y, &x));
        prop_assert_eq!(x.intersection(&y), y.intersection(&x));
    }
}

// ---------------------------------------------------------------------------
// Property 2: an entry never conflicts with itself
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn single_entry_has_no_conflicts(entries in arb_entries(2)) {
        for e in &entries {
            prop_assert!(detect_conflicts(std::slice::from_ref(e)).is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: detection is idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn detection_is_idempotent(entries in arb_entries(12)) {
        prop_assert_eq!(detect_conflicts(&entries), detect_conflicts(&entries));
    }
}

// ---------------------------------------------------------------------------
// Property 4: at most three records per pair
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn record_count_is_bounded(entries in arb_entries(12)) {
        let n = entries.len();
        let bound = n * n.saturating_sub(1) / 2 * 3;
        prop_assert!(detect_conflicts(&entries).len() <= bound);
    }
}

// ---------------------------------------------------------------------------
// Property 5: every record is a same-day, overlapping, ordered pair
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn records_only_for_same_day_overlaps(entries in arb_entries(12)) {
        let index_of = |id: &timetable_engine::EntryId| {
            entries.iter().position(|e| &e.id == id).unwrap()
        };
        for record in detect_conflicts(&entries) {
            let (i, j) = (index_of(&record.a), index_of(&record.b));
            prop_assert!(i < j);
            let (a, b) = (&entries[i], &entries[j]);
            prop_assert_eq!(&a.day, &b.day);
            prop_assert!(overlaps(&a.interval, &b.interval));
            prop_assert!(record.overlap_minutes > 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: moving everything onto distinct days removes all conflicts
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn distinct_days_never_conflict(entries in arb_entries(12)) {
        let spread: Vec<Entry> = entries
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.day = Day::new(format!("Day {}", i));
                e
            })
            .collect();
        prop_assert!(detect_conflicts(&spread).is_empty());
    }
}
