//! Error types for timetable-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Invalid time '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Invalid interval: end {end} must be after start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
