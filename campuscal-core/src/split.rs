//! Actionable vs ordinary event partitioning.
//!
//! An actionable event is a call to action (an application or registration
//! window) rather than an ordinary calendar entry. The presentation layer
//! shows the two groups on different surfaces.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::error::{CoreError, CoreResult};
use crate::event::Event;

pub const DEFAULT_TITLE_PATTERN: &str = r"^\s*apply\b";

pub const DEFAULT_KEYWORDS: &[&str] = &["application", "apply to", "apply for", "apply now"];

/// Heuristics deciding whether an event is actionable.
#[derive(Debug, Clone)]
pub struct ActionableRules {
    title_pattern: Regex,
    keywords: Vec<String>,
}

/// Result of `ActionableRules::split`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSplit {
    pub ordinary: Vec<Event>,
    pub actionable: Vec<Event>,
}

impl ActionableRules {
    /// `title_pattern` is matched case-insensitively; keywords are compared
    /// in lowercase.
    pub fn new(title_pattern: &str, keywords: Vec<String>) -> CoreResult<Self> {
        let title_pattern = RegexBuilder::new(title_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CoreError::InvalidPattern {
                key: "actionable.title_pattern".to_string(),
                source,
            })?;

        Ok(ActionableRules {
            title_pattern,
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    pub fn is_actionable(&self, event: &Event) -> bool {
        if self.title_pattern.is_match(&event.title) {
            return true;
        }

        let haystack = format!("{} {}", event.title, event.description).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Route each event: actionable iff it is actionable and has not ended.
    /// Input order is kept within each bucket.
    pub fn split(&self, events: impl IntoIterator<Item = Event>, now: DateTime<Utc>) -> EventSplit {
        let mut split = EventSplit::default();

        for event in events {
            if self.is_actionable(&event) && is_forward_active(&event, now) {
                split.actionable.push(event);
            } else {
                split.ordinary.push(event);
            }
        }

        split
    }
}

impl Default for ActionableRules {
    fn default() -> Self {
        ActionableRules {
            title_pattern: RegexBuilder::new(DEFAULT_TITLE_PATTERN)
                .case_insensitive(true)
                .build()
                .expect("built-in title pattern is valid"),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// True when the event has no end or ends after `now`.
pub fn is_forward_active(event: &Event, now: DateTime<Utc>) -> bool {
    match event.end {
        Some(end) => end > now,
        None => true,
    }
}

/// Events running at `now` (inclusive bounds; open-ended once started).
pub fn currently_live(events: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.start <= now && e.end.is_none_or(|end| now <= end))
        .collect()
}

/// Events starting after `now`, soonest first.
pub fn upcoming(events: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    let mut upcoming: Vec<&Event> = events.iter().filter(|e| e.start > now).collect();
    upcoming.sort_by(|a, b| Event::snapshot_order(a, b));
    upcoming
}
