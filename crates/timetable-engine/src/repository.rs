//! Timetable storage behind a small repository capability.
//!
//! The engine itself is a pure function over a snapshot; whoever owns the
//! mutable timetable goes through [`TimetableRepository`]. Both backends hold
//! the collection behind a `RwLock`, so mutations are serialized and `list`
//! always returns a consistent, owned snapshot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{info, warn};

use crate::conflict::{detect_conflicts, ConflictRecord};
use crate::entry::{Entry, EntryId};
use crate::error::{Result, TimetableError};

/// Storage contract for the mutable timetable collection.
///
/// Insertion order is preserved; it is the order conflict detection sees.
pub trait TimetableRepository: Send + Sync {
    /// Snapshot of all entries in insertion order.
    fn list(&self) -> Result<Vec<Entry>>;

    fn get(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// Append an entry. Fails with `DuplicateId` if the id is taken.
    fn add(&self, entry: Entry) -> Result<()>;

    /// Remove and return an entry. Fails with `EntryNotFound` for unknown ids.
    fn remove(&self, id: &EntryId) -> Result<Entry>;

    /// Replace the entry stored under `id`, keeping its position. The stored
    /// entry always carries `id`, whatever id `entry` had.
    fn update(&self, id: &EntryId, entry: Entry) -> Result<()>;
}

/// Run conflict detection over a fresh snapshot of `repo`.
pub fn detect_in<R: TimetableRepository + ?Sized>(repo: &R) -> Result<Vec<ConflictRecord>> {
    Ok(detect_conflicts(&repo.list()?))
}

fn lock_err(context: &'static str) -> TimetableError {
    TimetableError::Backend(format!("poisoned lock: {context}"))
}

fn read(entries: &RwLock<Vec<Entry>>) -> Result<RwLockReadGuard<'_, Vec<Entry>>> {
    entries.read().map_err(|_| lock_err("timetable read"))
}

fn write(entries: &RwLock<Vec<Entry>>) -> Result<RwLockWriteGuard<'_, Vec<Entry>>> {
    entries.write().map_err(|_| lock_err("timetable write"))
}

fn position(entries: &[Entry], id: &EntryId) -> Result<usize> {
    entries
        .iter()
        .position(|e| &e.id == id)
        .ok_or_else(|| TimetableError::EntryNotFound(id.to_string()))
}

fn insert(entries: &mut Vec<Entry>, entry: Entry) -> Result<()> {
    if entries.iter().any(|e| e.id == entry.id) {
        return Err(TimetableError::DuplicateId(entry.id.to_string()));
    }
    entries.push(entry);
    Ok(())
}

fn take(entries: &mut Vec<Entry>, id: &EntryId) -> Result<Entry> {
    let index = position(entries, id)?;
    Ok(entries.remove(index))
}

fn replace(entries: &mut [Entry], id: &EntryId, mut entry: Entry) -> Result<()> {
    let index = position(entries, id)?;
    entry.id = id.clone();
    entries[index] = entry;
    Ok(())
}

/// Process-local timetable with no persistence.
#[derive(Debug, Default)]
pub struct InMemoryTimetable {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the timetable with existing entries.
    ///
    /// # Errors
    /// Returns `DuplicateId` if two entries share an id.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut seeded = Vec::new();
        for entry in entries {
            insert(&mut seeded, entry)?;
        }
        Ok(Self {
            entries: RwLock::new(seeded),
        })
    }
}

impl TimetableRepository for InMemoryTimetable {
    fn list(&self) -> Result<Vec<Entry>> {
        Ok(read(&self.entries)?.clone())
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        Ok(read(&self.entries)?.iter().find(|e| &e.id == id).cloned())
    }

    fn add(&self, entry: Entry) -> Result<()> {
        insert(&mut *write(&self.entries)?, entry)
    }

    fn remove(&self, id: &EntryId) -> Result<Entry> {
        take(&mut *write(&self.entries)?, id)
    }

    fn update(&self, id: &EntryId, entry: Entry) -> Result<()> {
        replace(&mut *write(&self.entries)?, id, entry)
    }
}

/// Timetable persisted as a pretty-printed JSON array of entries.
///
/// The file is read once at [`JsonFileTimetable::open`] and rewritten in full
/// after every mutation via a sibling temp file and a rename. When the write
/// fails, the in-memory collection is rolled back to its last-known-good state
/// and the error is returned.
#[derive(Debug)]
pub struct JsonFileTimetable {
    path: PathBuf,
    entries: RwLock<Vec<Entry>>,
}

impl JsonFileTimetable {
    /// Open the timetable at `path`. A missing file is an empty timetable.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, `Json` if it is not a valid
    /// entry array (including entries whose end is not after their start),
    /// and `DuplicateId` if two stored entries share an id.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded: Vec<Entry> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::with_capacity(loaded.len());
        for entry in loaded {
            insert(&mut entries, entry)?;
        }
        info!("loaded {} entries from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` under the write lock and persist the result, restoring
    /// the previous collection if either step fails.
    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<Entry>) -> Result<T>) -> Result<T> {
        let mut entries = write(&self.entries)?;
        let last_good = entries.clone();

        let outcome = change(&mut *entries).and_then(|value| {
            self.persist(&entries)?;
            Ok(value)
        });

        if let Err(e) = &outcome {
            if matches!(e, TimetableError::Io(_) | TimetableError::Json(_)) {
                warn!("write to {} failed, keeping previous timetable: {}", self.path.display(), e);
            }
            *entries = last_good;
        }
        outcome
    }

    fn persist(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "timetable".into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        info!("saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl TimetableRepository for JsonFileTimetable {
    fn list(&self) -> Result<Vec<Entry>> {
        Ok(read(&self.entries)?.clone())
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        Ok(read(&self.entries)?.iter().find(|e| &e.id == id).cloned())
    }

    fn add(&self, entry: Entry) -> Result<()> {
        self.mutate(|entries| insert(entries, entry))
    }

    fn remove(&self, id: &EntryId) -> Result<Entry> {
        self.mutate(|entries| take(entries, id))
    }

    fn update(&self, id: &EntryId, entry: Entry) -> Result<()> {
        self.mutate(|entries| replace(entries, id, entry))
    }
}
