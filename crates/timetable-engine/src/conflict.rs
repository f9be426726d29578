//! Detect room, teacher, and class conflicts in a timetable snapshot.
//!
//! Every unordered pair of entries `(i, j)`, `i < j` in input order, is examined
//! once. A pair is a candidate when both entries share a day key and their
//! intervals overlap (adjacent intervals do NOT overlap). Each candidate is then
//! checked against the room, teacher, and class rules independently, so one pair
//! yields between zero and three records.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryId};

/// Which shared resource a conflict is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    RoomConflict,
    TeacherConflict,
    ClassConflict,
}

impl ConflictKind {
    /// Rule evaluation order for a candidate pair.
    pub const ALL: [ConflictKind; 3] = [
        ConflictKind::RoomConflict,
        ConflictKind::TeacherConflict,
        ConflictKind::ClassConflict,
    ];

    fn resource(self, entry: &Entry) -> Option<&str> {
        match self {
            ConflictKind::RoomConflict => entry.room.as_deref(),
            ConflictKind::TeacherConflict => entry.teacher.as_deref(),
            ConflictKind::ClassConflict => entry.class_name.as_deref(),
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictKind::RoomConflict => "Room Conflict",
            ConflictKind::TeacherConflict => "Teacher Conflict",
            ConflictKind::ClassConflict => "Class Conflict",
        })
    }
}

/// One rule violation for one conflicting pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub kind: ConflictKind,
    /// The earlier entry of the pair in input order.
    pub a: EntryId,
    /// The later entry of the pair in input order.
    pub b: EntryId,
    /// Length of the shared part of the two intervals.
    pub overlap_minutes: u16,
    pub message: String,
}

/// Whether two optional resource keys name the same resource.
///
/// True iff both are present, non-empty after trimming, and equal ignoring
/// case. Two unspecified rooms are not "the same room".
pub fn matches(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(str::trim), b.map(str::trim)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            a.to_lowercase() == b.to_lowercase()
        }
        _ => false,
    }
}

/// Find every room, teacher, and class conflict among `entries`.
///
/// Records are ordered by pair `(i, j)` in input order, then by rule
/// (room, teacher, class). The result is deterministic for a given input
/// sequence and never contains a pair of an entry with itself.
pub fn detect_conflicts(entries: &[Entry]) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();

    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            evaluate_pair(a, b, &mut conflicts);
        }
    }

    debug!(
        "examined {} entries, found {} conflict(s)",
        entries.len(),
        conflicts.len()
    );
    conflicts
}

/// Check a prospective entry against an existing timetable before storing it.
///
/// Each record has the existing entry as `a` and the candidate as `b`. An
/// existing entry with the candidate's id is skipped so that a replacement can
/// be checked against the rest of the timetable.
pub fn check_candidate(existing: &[Entry], candidate: &Entry) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();
    for entry in existing.iter().filter(|e| e.id != candidate.id) {
        evaluate_pair(entry, candidate, &mut conflicts);
    }
    conflicts
}

/// Ids of every entry that takes part in at least one conflict.
pub fn participants(records: &[ConflictRecord]) -> BTreeSet<EntryId> {
    records
        .iter()
        .flat_map(|r| [r.a.clone(), r.b.clone()])
        .collect()
}

fn evaluate_pair(a: &Entry, b: &Entry, out: &mut Vec<ConflictRecord>) {
    if a.day != b.day {
        return;
    }
    let Some(shared) = a.interval.intersection(&b.interval) else {
        return;
    };

    for kind in ConflictKind::ALL {
        let (ra, rb) = (kind.resource(a), kind.resource(b));
        if !matches(ra, rb) {
            continue;
        }
        // `matches` guarantees the resource is present.
        let resource = ra.map(str::trim).unwrap_or_default();
        out.push(ConflictRecord {
            kind,
            a: a.id.clone(),
            b: b.id.clone(),
            overlap_minutes: shared.duration_minutes(),
            message: render_message(kind, resource, a, b),
        });
    }
}

fn render_message(kind: ConflictKind, resource: &str, a: &Entry, b: &Entry) -> String {
    let headline = match kind {
        ConflictKind::RoomConflict | ConflictKind::TeacherConflict => {
            format!("{} double booked", resource)
        }
        ConflictKind::ClassConflict => format!("{} has 2 classes", resource),
    };
    format!(
        "{} at {} {} and {} ('{}' and '{}')",
        headline, a.day, a.interval, b.interval, a.subject, b.subject
    )
}
