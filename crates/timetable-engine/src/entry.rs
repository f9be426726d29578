//! Scheduled class occurrences.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Interval;

/// Opaque entry identifier, assigned by whoever creates the entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Day key of an entry.
///
/// Compared with exact string equality; the engine never interprets it as a
/// weekday number. [`Day::STANDARD`] lists the days offered by the timetable
/// forms, and [`Day::canonical`] folds case variants of those onto one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(String);

impl Day {
    pub const STANDARD: [&'static str; 6] =
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

    /// Wrap a day key verbatim.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Trim the key and map any case variant of a standard day name to its
    /// canonical spelling ("monday" -> "Monday"). Other keys pass through.
    pub fn canonical(key: &str) -> Self {
        let trimmed = key.trim();
        match Self::STANDARD
            .iter()
            .find(|name| name.eq_ignore_ascii_case(trimmed))
        {
            Some(name) => Self((*name).to_string()),
            None => Self(trimmed.to_string()),
        }
    }

    pub fn is_standard(&self) -> bool {
        Self::STANDARD.contains(&self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// One scheduled class occurrence.
///
/// The interval is valid by construction, so an `Entry` always satisfies
/// `start < end`. Optional resources that are absent or blank never take part
/// in a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// What is being taught.
    pub subject: String,
    /// Class or section attending; the key for class conflicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub day: Day,
    #[serde(flatten)]
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
}

impl Entry {
    pub fn new(
        id: impl Into<EntryId>,
        subject: impl Into<String>,
        day: Day,
        interval: Interval,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            class_name: None,
            day,
            interval,
            room: None,
            teacher: None,
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}
