//! Snapshot diff types.

mod diff_kind;
mod event_update;
mod snapshot_diff;

pub use diff_kind::DiffKind;
pub use event_update::{EventUpdate, FieldChange, TrackedField};
pub use snapshot_diff::SnapshotDiff;
