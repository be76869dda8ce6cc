//! Terminal rendering for campuscal-core types.
//!
//! Extension traits that add colored output via owo_colors. Plain-text
//! versions of the same reports live in the core crate.

use campuscal_core::Event;
use campuscal_core::diff::{DiffKind, EventUpdate, SnapshotDiff};
use campuscal_core::snapshot::CommitOutcome;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            DiffKind::Added => symbol.green().to_string(),
            DiffKind::Updated => symbol.yellow().to_string(),
            DiffKind::Removed => symbol.red().to_string(),
        }
    }
}

fn colorize_diff(kind: DiffKind, text: &str) -> String {
    match kind {
        DiffKind::Added => text.green().to_string(),
        DiffKind::Updated => text.yellow().to_string(),
        DiffKind::Removed => text.red().to_string(),
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let when = match self.end {
            Some(end) => format!("{} → {}", self.start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M")),
            None => self.start.format("%Y-%m-%d %H:%M").to_string(),
        };

        format!(
            "{} {} {} {}",
            self.org_emojis,
            self.title,
            format!("[{}]", self.primary_org).dimmed(),
            when.dimmed()
        )
    }
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 5;

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn render_field_changes(update: &EventUpdate) -> Vec<String> {
    update
        .changes
        .iter()
        .map(|(field, change)| {
            let from = change.from.as_deref().unwrap_or("(none)");
            let to = change.to.as_deref().unwrap_or("(none)");
            format!("{}: {} → {}", field.name().dimmed(), from.red(), to.green())
        })
        .collect()
}

/// Changed events, one per line, or per-kind counts when there are many and
/// `verbose` is off.
pub fn render_diff(diff: &SnapshotDiff, verbose: bool) -> String {
    if diff.is_empty() {
        return "   No changes".dimmed().to_string();
    }

    let mut lines = Vec::new();

    if verbose || diff.len() <= COMPACT_THRESHOLD {
        let mut updates = diff.updated.iter();
        for (kind, id, title) in diff.entries() {
            lines.push(format!(
                "   {} {} {}",
                kind.render(),
                colorize_diff(kind, title),
                format!("({})", id).dimmed()
            ));
            // entries() yields updates in the same order as `diff.updated`
            if kind == DiffKind::Updated
                && let Some(update) = updates.next()
            {
                lines.extend(render_field_changes(update).into_iter().map(|l| format!("      {}", l)));
            }
        }
    } else {
        let counts = [
            (DiffKind::Added, diff.added.len(), "new"),
            (DiffKind::Updated, diff.updated.len(), "changed"),
            (DiffKind::Removed, diff.removed.len(), "removed"),
        ];
        for (kind, count, verb) in counts {
            if count > 0 {
                let label = format!("({} {} {})", count, verb, pluralize("event", count));
                lines.push(format!("   {} {}", kind.render(), colorize_diff(kind, &label)));
            }
        }
    }

    lines.join("\n")
}

/// Summary of a snapshot commit.
pub fn render_outcome(outcome: &CommitOutcome, verbose: bool) -> String {
    if !outcome.written {
        return "   No changes".dimmed().to_string();
    }

    let count = format!(
        "   {} {} in snapshot",
        outcome.event_count,
        pluralize("event", outcome.event_count)
    );

    if outcome.diff.is_empty() {
        // Content changed without any tracked field changing (e.g. org colors)
        return format!("   {}\n{}", "Snapshot rewritten".yellow(), count.dimmed());
    }

    format!("{}\n{}", render_diff(&outcome.diff, verbose), count.dimmed())
}

/// The sync change log: every changed event on its own line, never compacted.
pub fn render_change_log(outcome: &CommitOutcome) -> String {
    render_outcome(outcome, true)
}

/// A titled list of events.
pub fn render_section(heading: &str, events: &[&Event]) -> String {
    let mut lines = vec![format!("{} {}", heading.bold(), format!("({})", events.len()).dimmed())];

    if events.is_empty() {
        lines.push(format!("   {}", "None".dimmed()));
    }
    lines.extend(events.iter().map(|e| format!("   {}", e.render())));

    lines.join("\n")
}
