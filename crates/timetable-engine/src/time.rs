//! Wall-clock times and half-open time intervals.
//!
//! A [`TimeOfDay`] is a count of minutes since midnight parsed from `HH:MM`.
//! An [`Interval`] is a `[start, end)` range with `start < end`, enforced at
//! construction. Every overlap decision in the crate goes through [`overlaps`].

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// First selectable time on the default slot grid (08:00).
pub const DEFAULT_FIRST_SLOT: TimeOfDay = TimeOfDay(8 * 60);
/// Last selectable time on the default slot grid (18:00).
pub const DEFAULT_LAST_SLOT: TimeOfDay = TimeOfDay(18 * 60);
/// Spacing of the default slot grid.
pub const DEFAULT_SLOT_STEP_MINUTES: u16 = 30;

/// A wall-clock time with minute granularity (0..=1439 minutes since midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimetableError::Parse {
                input: minutes.to_string(),
                reason: format!("minutes since midnight must be below {}", MINUTES_PER_DAY),
            });
        }
        Ok(Self(minutes))
    }

    /// Build a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(TimetableError::Parse {
                input: format!("{}:{}", hour, minute),
                reason: "hour must be 0-23 and minute 0-59".to_string(),
            });
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Parse an `HH:MM` string (surrounding whitespace is ignored).
    ///
    /// # Errors
    /// Returns `TimetableError::Parse` for malformed strings and for
    /// out-of-range hours or minutes (e.g. `"24:00"`, `"10:60"`).
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|e| TimetableError::Parse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        // NaiveTime guarantees hour < 24 and minute < 60.
        Ok(Self((time.hour() * 60 + time.minute()) as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Serde shape of an interval; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: TimeOfDay,
    end: TimeOfDay,
}

/// A half-open time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Interval {
    /// Build an interval.
    ///
    /// # Errors
    /// Returns `TimetableError::InvalidInterval` when `end <= start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if end <= start {
            return Err(TimetableError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both endpoints from `HH:MM` strings and build the interval.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.0 - self.start.0
    }

    /// See [`overlaps`].
    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self, other)
    }

    /// The shared part of two overlapping intervals, or `None` when they
    /// do not overlap (touching endpoints included).
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !overlaps(self, other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = TimetableError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        RawInterval {
            start: interval.start,
            end: interval.end,
        }
    }
}

/// Whether two intervals overlap.
///
/// Two intervals overlap iff `x.start < y.end && y.start < x.end`. Adjacent
/// intervals where one ends exactly when the other starts do NOT overlap.
pub fn overlaps(x: &Interval, y: &Interval) -> bool {
    x.start < y.end && y.start < x.end
}

/// Inclusive grid of selectable times from `first` to `last`, `step_minutes` apart.
///
/// Returns an empty grid when `step_minutes` is zero or `last < first`.
pub fn time_slots(first: TimeOfDay, last: TimeOfDay, step_minutes: u16) -> Vec<TimeOfDay> {
    if step_minutes == 0 {
        return Vec::new();
    }
    (first.0..=last.0)
        .step_by(step_minutes as usize)
        .map(TimeOfDay)
        .collect()
}
