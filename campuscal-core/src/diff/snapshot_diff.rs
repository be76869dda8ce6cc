//! Snapshot diff computation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diff::{DiffKind, EventUpdate};
use crate::event::Event;

/// Differences between a previous and a current event set, keyed by id.
///
/// Each bucket is ordered by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    pub added: Vec<Event>,
    pub updated: Vec<EventUpdate>,
    pub removed: Vec<Event>,
}

impl SnapshotDiff {
    pub fn compute(previous: &[Event], current: &[Event]) -> SnapshotDiff {
        let previous_by_id: BTreeMap<&str, &Event> =
            previous.iter().map(|e| (e.id.as_str(), e)).collect();
        let current_by_id: BTreeMap<&str, &Event> =
            current.iter().map(|e| (e.id.as_str(), e)).collect();

        let mut diff = SnapshotDiff::default();

        for (id, new) in &current_by_id {
            match previous_by_id.get(id) {
                Some(old) => {
                    if let Some(update) = EventUpdate::between(old, new) {
                        diff.updated.push(update);
                    }
                }
                None => diff.added.push((*new).clone()),
            }
        }

        diff.removed = previous_by_id
            .iter()
            .filter(|(id, _)| !current_by_id.contains_key(*id))
            .map(|(_, old)| (*old).clone())
            .collect();

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    /// (kind, id, title) for every change: additions, then updates, then removals.
    pub fn entries(&self) -> impl Iterator<Item = (DiffKind, &str, &str)> {
        let added = self
            .added
            .iter()
            .map(|e| (DiffKind::Added, e.id.as_str(), e.title.as_str()));
        let updated = self
            .updated
            .iter()
            .map(|u| (DiffKind::Updated, u.id.as_str(), u.title.as_str()));
        let removed = self
            .removed
            .iter()
            .map(|e| (DiffKind::Removed, e.id.as_str(), e.title.as_str()));

        added.chain(updated).chain(removed)
    }

    /// One line per added, updated or removed event.
    pub fn report(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .added
            .iter()
            .map(|e| format!("{} {} ({})", DiffKind::Added, e.title, e.id))
            .collect();

        lines.extend(self.updated.iter().map(|u| {
            format!(
                "{} {} ({}): {}",
                DiffKind::Updated,
                u.title,
                u.id,
                u.changed_fields()
            )
        }));

        lines.extend(
            self.removed
                .iter()
                .map(|e| format!("{} {} ({})", DiffKind::Removed, e.title, e.id)),
        );

        lines
    }
}
