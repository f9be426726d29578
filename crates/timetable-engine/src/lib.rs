//! # timetable-engine
//!
//! Deterministic conflict detection for class timetables.
//!
//! Given a snapshot of timetabled entries, the engine reports every pair of
//! entries that share a day, overlap in time, and compete for the same room,
//! teacher, or class/section. Detection is a pure function over its input;
//! storage lives behind the [`repository`] capability so callers can recompute
//! conflicts from a consistent snapshot after every mutation.
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` times, half-open intervals, and the slot grid
//! - [`entry`] — Scheduled class occurrences and their day keys
//! - [`conflict`] — Pairwise room / teacher / class conflict detection
//! - [`repository`] — In-memory and JSON-file timetable stores
//! - [`error`] — Error types

pub mod conflict;
pub mod entry;
pub mod error;
pub mod repository;
pub mod time;

pub use conflict::{
    check_candidate, detect_conflicts, matches, participants, ConflictKind, ConflictRecord,
};
pub use entry::{Day, Entry, EntryId};
pub use error::TimetableError;
pub use repository::{detect_in, InMemoryTimetable, JsonFileTimetable, TimetableRepository};
pub use time::{overlaps, time_slots, Interval, TimeOfDay};
