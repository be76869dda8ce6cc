//! Snapshot persistence.
//!
//! The snapshot is the JSON file the presentation layer reads. It is only
//! replaced when its content actually changes, so rerunning the pipeline over
//! an unchanged feed leaves the file (and its modification time) untouched.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::diff::SnapshotDiff;
use crate::error::CoreResult;
use crate::event::Event;

/// Outcome of `Snapshot::commit` (or a dry-run `Snapshot::preview`).
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// Whether the snapshot file was (or would be) rewritten.
    pub written: bool,
    pub diff: SnapshotDiff,
    pub event_count: usize,
}

impl CommitOutcome {
    /// Change log: one line per changed event, or a "no changes" line.
    pub fn report(&self) -> Vec<String> {
        if !self.written {
            return vec!["No changes".to_string()];
        }
        let mut lines = self.diff.report();
        lines.push(format!("{} events in snapshot", self.event_count));
        lines
    }
}

/// The persisted snapshot file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Snapshot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events currently on disk. A missing or unreadable file is an empty
    /// snapshot.
    pub fn load(&self) -> Vec<Event> {
        self.read_existing().1
    }

    /// Diff against the snapshot and replace it if the serialized output differs.
    pub fn commit(&self, current: &[Event]) -> CoreResult<CommitOutcome> {
        let (outcome, serialized) = self.prepare(current)?;

        if outcome.written {
            self.write_atomic(serialized.as_bytes())?;
            tracing::info!(
                path = %self.path.display(),
                events = outcome.event_count,
                changes = outcome.diff.len(),
                "snapshot written"
            );
        } else {
            tracing::info!(path = %self.path.display(), "snapshot unchanged");
        }

        Ok(outcome)
    }

    /// Same as `commit`, without writing anything.
    pub fn preview(&self, current: &[Event]) -> CoreResult<CommitOutcome> {
        Ok(self.prepare(current)?.0)
    }

    fn prepare(&self, current: &[Event]) -> CoreResult<(CommitOutcome, String)> {
        let (existing_bytes, previous) = self.read_existing();

        let diff = SnapshotDiff::compute(&previous, current);
        let serialized = serialize(current)?;

        let unchanged = existing_bytes
            .as_deref()
            .is_some_and(|bytes| fingerprint(bytes) == fingerprint(serialized.as_bytes()));

        let outcome = CommitOutcome {
            written: !unchanged,
            diff,
            event_count: current.len(),
        };
        Ok((outcome, serialized))
    }

    /// Raw bytes on disk (if any) and the events they decode to.
    fn read_existing(&self) -> (Option<Vec<u8>>, Vec<Event>) {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (None, Vec::new()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read snapshot, treating as empty");
                return (None, Vec::new());
            }
        };

        let events = match parse(&bytes) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt snapshot, treating as empty");
                Vec::new()
            }
        };

        (Some(bytes), events)
    }

    fn write_atomic(&self, bytes: &[u8]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        let temp = self.path.with_file_name(format!(".{file_name}.tmp"));

        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Serialize events in snapshot order as pretty JSON with a trailing newline.
pub fn serialize(events: &[Event]) -> CoreResult<String> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| Event::snapshot_order(a, b));

    let mut json = serde_json::to_string_pretty(&sorted)?;
    json.push('\n');
    Ok(json)
}

pub fn parse(bytes: &[u8]) -> CoreResult<Vec<Event>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Hex SHA-256 of snapshot bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
