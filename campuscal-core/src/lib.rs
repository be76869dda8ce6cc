//! Core pipeline for campuscal.
//!
//! This crate turns raw calendar feed records into canonical events and keeps a
//! published snapshot of them up to date:
//! - `text` and `normalize` canonicalize raw feed fields
//! - `org` detects hosting organizations from an ordered pattern registry
//! - `split` separates actionable (application) events from ordinary ones
//! - `diff` and `snapshot` compare against and idempotently replace the snapshot
//! - `ics` and `pipeline` read feed text into a sorted event set

pub mod diff;
pub mod error;
pub mod event;
pub mod ics;
pub mod normalize;
pub mod org;
pub mod pipeline;
pub mod snapshot;
pub mod split;
pub mod text;

pub use error::{CoreError, CoreResult};
pub use event::{Event, FeedTime, RawEvent};
pub use text::TextField;
