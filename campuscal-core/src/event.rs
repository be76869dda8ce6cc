//! Event types.
//!
//! `RawEvent` is a record as it comes out of the feed; `Event` is the canonical
//! form persisted in the snapshot and consumed by the presentation layer.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::text::TextField;

/// A canonical calendar event.
///
/// Field order here is the field order of the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub description: String,
    pub url: Option<String>,
    /// Matching organization keys in registry priority order; never empty.
    pub hosting_org: Vec<String>,
    pub primary_org: String,

    // Display tokens, derived from the orgs above
    pub primary_org_color: String,
    pub primary_org_emoji: String,
    pub org_emojis: String,
}

impl Event {
    /// Snapshot ordering: ascending start, ties broken by id.
    pub fn snapshot_order(a: &Event, b: &Event) -> Ordering {
        a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id))
    }
}

/// A calendar component record from the feed source, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub uid: Option<String>,
    pub summary: Option<TextField>,
    pub start: Option<FeedTime>,
    pub end: Option<FeedTime>,
    pub description: Option<TextField>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
}

impl RawEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("CANCELLED"))
    }
}

/// A date or date-time as written in the feed, not yet pinned to UTC.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedTime {
    Utc(DateTime<Utc>),
    Floating(NaiveDateTime),
    Zoned { datetime: NaiveDateTime, tzid: String },
    Date(NaiveDate),
}

impl FeedTime {
    /// Resolve to a UTC instant.
    ///
    /// Floating times and all-day dates are read in `default_tz`, as is a
    /// zoned time whose TZID is not a known IANA zone. Returns `None` for a
    /// local time that does not exist in its zone.
    pub fn to_utc(&self, default_tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            FeedTime::Utc(dt) => Some(*dt),
            FeedTime::Floating(naive) => local_to_utc(default_tz, naive),
            FeedTime::Zoned { datetime, tzid } => {
                let tz = tzid.trim_matches('"').parse::<Tz>().unwrap_or_else(|_| {
                    tracing::debug!(tzid, "unknown TZID, using default time zone");
                    default_tz
                });
                local_to_utc(tz, datetime)
            }
            FeedTime::Date(date) => local_to_utc(default_tz, &date.and_hms_opt(0, 0, 0)?),
        }
    }
}

impl fmt::Display for FeedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedTime::Utc(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            FeedTime::Floating(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            FeedTime::Zoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%dT%H:%M:%S"), tzid)
            }
            FeedTime::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

fn local_to_utc(tz: Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
