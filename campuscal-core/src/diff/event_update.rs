use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Event fields compared when deciding whether an event was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedField {
    Title,
    Start,
    End,
    Description,
    Url,
}

impl TrackedField {
    pub const ALL: [TrackedField; 5] = [
        TrackedField::Title,
        TrackedField::Start,
        TrackedField::End,
        TrackedField::Description,
        TrackedField::Url,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrackedField::Title => "title",
            TrackedField::Start => "start",
            TrackedField::End => "end",
            TrackedField::Description => "description",
            TrackedField::Url => "url",
        }
    }

    /// The field's value on `event`; `None` when absent.
    pub fn value_of(&self, event: &Event) -> Option<String> {
        match self {
            TrackedField::Title => Some(event.title.clone()),
            TrackedField::Start => Some(instant(&event.start)),
            TrackedField::End => event.end.as_ref().map(instant),
            TrackedField::Description => Some(event.description.clone()),
            TrackedField::Url => event.url.clone(),
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Old and new value of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// An event present in both snapshots with at least one tracked field changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    pub id: String,
    /// Title in the current snapshot.
    pub title: String,
    pub changes: BTreeMap<TrackedField, FieldChange>,
}

impl EventUpdate {
    pub fn between(old: &Event, new: &Event) -> Option<EventUpdate> {
        let changes: BTreeMap<_, _> = TrackedField::ALL
            .iter()
            .filter_map(|field| {
                let from = field.value_of(old);
                let to = field.value_of(new);
                (from != to).then_some((*field, FieldChange { from, to }))
            })
            .collect();

        if changes.is_empty() {
            return None;
        }

        Some(EventUpdate {
            id: new.id.clone(),
            title: new.title.clone(),
            changes,
        })
    }

    /// Changed field names, e.g. "title, end".
    pub fn changed_fields(&self) -> String {
        self.changes
            .keys()
            .map(TrackedField::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
