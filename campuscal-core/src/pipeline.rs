//! Raw feed records → the candidate event set for a snapshot.

use std::collections::HashMap;

use crate::event::{Event, RawEvent};
use crate::normalize::EventNormalizer;

/// Events built from one feed, plus counts of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Unique by id, in snapshot order.
    pub events: Vec<Event>,
    pub cancelled: usize,
    /// Records that failed validation (e.g. no start time).
    pub skipped: usize,
}

/// Normalize every non-cancelled record.
///
/// Invalid records are logged and skipped rather than failing the run. When
/// two records share an id the later one wins.
pub fn build_events(records: &[RawEvent], normalizer: &EventNormalizer) -> BuildOutcome {
    let mut outcome = BuildOutcome::default();
    let mut by_id: HashMap<String, Event> = HashMap::new();

    for raw in records {
        if raw.is_cancelled() {
            outcome.cancelled += 1;
            continue;
        }

        match normalizer.normalize_event(raw) {
            Ok(event) => {
                if let Some(previous) = by_id.insert(event.id.clone(), event) {
                    tracing::debug!(id = %previous.id, "duplicate event id, keeping the later record");
                }
            }
            Err(e) => {
                tracing::warn!(uid = ?raw.uid, error = %e, "skipping invalid feed record");
                outcome.skipped += 1;
            }
        }
    }

    let mut events: Vec<Event> = by_id.into_values().collect();
    events.sort_by(Event::snapshot_order);
    outcome.events = events;

    tracing::debug!(
        events = outcome.events.len(),
        cancelled = outcome.cancelled,
        skipped = outcome.skipped,
        "built event set"
    );

    outcome
}
