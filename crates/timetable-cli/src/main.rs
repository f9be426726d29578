//! `timetable` CLI — keep a class timetable in a JSON file and report conflicts.
//!
//! ## Usage
//!
//! ```sh
//! # Add a class (refuses if it clashes with an existing class)
//! timetable add --subject Math --day Monday --start 09:00 --end 10:30 --room 101 --teacher Smith
//!
//! # Add it anyway
//! timetable add --subject Physics --day Monday --start 10:00 --end 11:00 --room 101 --force
//!
//! # Show every room / teacher / class conflict
//! timetable conflicts
//! timetable conflicts --json
//!
//! # List classes with a derived conflict flag
//! timetable list
//!
//! # Replace or delete a class by id
//! timetable update <ID> --subject Math --day Tuesday --start 09:00 --end 10:00
//! timetable remove <ID>
//!
//! # Print the selectable time grid (08:00-18:00 every 30 minutes)
//! timetable slots
//! ```
//!
//! The timetable file defaults to `timetable_data.json` and can be set with
//! `--file` or `TIMETABLE_FILE`. Log verbosity follows `RUST_LOG`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::debug;
use serde::Serialize;
use timetable_engine::time::{DEFAULT_FIRST_SLOT, DEFAULT_LAST_SLOT, DEFAULT_SLOT_STEP_MINUTES};
use timetable_engine::{
    check_candidate, detect_conflicts, detect_in, participants, time_slots, ConflictRecord, Day,
    Entry, EntryId, Interval, JsonFileTimetable, TimeOfDay, TimetableRepository,
};

#[derive(Parser)]
#[command(
    name = "timetable",
    version,
    about = "Class timetable with room, teacher and class conflict detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Timetable JSON file
    #[arg(long, global = true, env = "TIMETABLE_FILE", default_value = "timetable_data.json")]
    file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a class to the timetable
    Add {
        #[command(flatten)]
        fields: EntryFields,
        /// Store the class even if it conflicts with existing classes
        #[arg(long)]
        force: bool,
    },
    /// Replace the class stored under ID
    Update {
        id: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Delete the class stored under ID
    Remove { id: String },
    /// List classes with a derived conflict flag
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Report every conflict in the timetable
    Conflicts {
        /// Print JSON instead of messages
        #[arg(long)]
        json: bool,
    },
    /// Print the grid of selectable start/end times
    Slots {
        #[arg(long, value_parser = parse_time, default_value_t = DEFAULT_FIRST_SLOT)]
        first: TimeOfDay,
        #[arg(long, value_parser = parse_time, default_value_t = DEFAULT_LAST_SLOT)]
        last: TimeOfDay,
        /// Minutes between slots
        #[arg(long, default_value_t = DEFAULT_SLOT_STEP_MINUTES)]
        step: u16,
    },
}

/// Class fields shared by `add` and `update`.
#[derive(Args)]
struct EntryFields {
    /// Subject being taught
    #[arg(long)]
    subject: String,
    /// Day key; Monday..Saturday in any case are canonicalised
    #[arg(long)]
    day: String,
    /// Start time (HH:MM)
    #[arg(long)]
    start: String,
    /// End time (HH:MM), must be after the start
    #[arg(long)]
    end: String,
    #[arg(long)]
    room: Option<String>,
    #[arg(long)]
    teacher: Option<String>,
    /// Class or section attending
    #[arg(long)]
    class_name: Option<String>,
}

/// An entry as listed, with its conflict flag projected from the records.
#[derive(Serialize)]
struct ListedEntry<'a> {
    #[serde(flatten)]
    entry: &'a Entry,
    conflict: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("using timetable file {}", cli.file.display());

    match cli.command {
        Commands::Add { fields, force } => {
            let repo = open(&cli.file)?;
            let id = uuid::Uuid::new_v4().to_string();
            let candidate = build_entry(EntryId::new(id), fields)?;

            let clashes = check_candidate(&repo.list()?, &candidate);
            if !clashes.is_empty() && !force {
                eprintln!("Conflict detected:");
                for clash in &clashes {
                    eprintln!("  - {}", clash.message);
                }
                bail!(
                    "{} conflict(s) with existing classes; re-run with --force to add anyway",
                    clashes.len()
                );
            }

            let id = candidate.id.clone();
            repo.add(candidate).context("Failed to add class")?;
            println!("{}", id);
            report_count(&repo)?;
        }
        Commands::Update { id, fields } => {
            let repo = open(&cli.file)?;
            let id = EntryId::new(id);
            let entry = build_entry(id.clone(), fields)?;
            repo.update(&id, entry)
                .with_context(|| format!("Failed to update class {}", id))?;
            println!("Updated {}", id);
            report_count(&repo)?;
        }
        Commands::Remove { id } => {
            let repo = open(&cli.file)?;
            let id = EntryId::new(id);
            let removed = repo
                .remove(&id)
                .with_context(|| format!("Failed to remove class {}", id))?;
            println!("Removed {} ({})", removed.id, removed.subject);
            report_count(&repo)?;
        }
        Commands::List { json } => {
            let repo = open(&cli.file)?;
            let entries = repo.list()?;
            let flagged = participants(&detect_conflicts(&entries));
            print_entries(&entries, &flagged, json)?;
        }
        Commands::Conflicts { json } => {
            let repo = open(&cli.file)?;
            let conflicts = detect_conflicts(&repo.list()?);
            print_conflicts(&conflicts, json)?;
        }
        Commands::Slots { first, last, step } => {
            if step == 0 {
                bail!("--step must be at least 1 minute");
            }
            for slot in time_slots(first, last, step) {
                println!("{}", slot);
            }
        }
    }

    Ok(())
}

fn parse_time(s: &str) -> std::result::Result<TimeOfDay, String> {
    TimeOfDay::parse(s).map_err(|e| e.to_string())
}

fn open(path: &Path) -> Result<JsonFileTimetable> {
    JsonFileTimetable::open(path)
        .with_context(|| format!("Failed to load timetable: {}", path.display()))
}

/// Validate form input and build an entry. Blank optional fields are dropped.
fn build_entry(id: EntryId, fields: EntryFields) -> Result<Entry> {
    let subject = fields.subject.trim();
    if subject.is_empty() {
        bail!("Subject name must not be empty");
    }
    let day = Day::canonical(&fields.day);
    if day.as_str().is_empty() {
        bail!("Day must not be empty");
    }
    let interval = Interval::parse(&fields.start, &fields.end).context("Invalid class time")?;

    let mut entry = Entry::new(id, subject, day, interval);
    entry.room = non_blank(fields.room);
    entry.teacher = non_blank(fields.teacher);
    entry.class_name = non_blank(fields.class_name);
    Ok(entry)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Recompute conflicts after a mutation and print the total.
fn report_count<R: TimetableRepository>(repo: &R) -> Result<()> {
    let conflicts = detect_in(repo)?;
    println!("{} conflict(s) in timetable", conflicts.len());
    Ok(())
}

fn print_entries(entries: &[Entry], flagged: &BTreeSet<EntryId>, json: bool) -> Result<()> {
    if json {
        let listed: Vec<ListedEntry<'_>> = entries
            .iter()
            .map(|entry| ListedEntry {
                entry,
                conflict: flagged.contains(&entry.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No classes scheduled.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  {:<9} {}  {}  room={} teacher={} class={}{}",
            entry.id,
            entry.day,
            entry.interval,
            entry.subject,
            entry.room.as_deref().unwrap_or("N/A"),
            entry.teacher.as_deref().unwrap_or("N/A"),
            entry.class_name.as_deref().unwrap_or("N/A"),
            if flagged.contains(&entry.id) { "  [CONFLICT]" } else { "" },
        );
    }
    Ok(())
}

fn print_conflicts(conflicts: &[ConflictRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No conflicts found.");
        return Ok(());
    }
    println!("Found {} conflict(s):", conflicts.len());
    for conflict in conflicts {
        println!("[{}] {}", conflict.kind, conflict.message);
    }
    Ok(())
}
