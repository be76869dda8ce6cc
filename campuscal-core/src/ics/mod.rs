//! ICS feed reading.
//!
//! Turns the text of an iCalendar feed (RFC 5545) into raw event records.

mod parse;

pub use parse::parse_feed;
