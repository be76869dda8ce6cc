//! Feed parsing using the icalendar crate's parser.

use std::borrow::Cow;

use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{CoreError, CoreResult};
use crate::event::{FeedTime, RawEvent};
use crate::text::TextField;

/// Parse feed text into one raw record per VEVENT, in feed order.
pub fn parse_feed(content: &str) -> CoreResult<Vec<RawEvent>> {
    let joined = join_soft_line_breaks(content);
    let unfolded = unfold(&joined);
    let calendar = read_calendar(&unfolded).map_err(|e| CoreError::FeedParse(e.to_string()))?;

    let mut vevents = Vec::new();
    for component in &calendar.components {
        collect_vevents(component, &mut vevents);
    }

    Ok(vevents.into_iter().map(to_raw_event).collect())
}

/// Quoted-printable values wrap with a trailing `=` (a soft line break)
/// rather than RFC 5545 folding; rejoin them so the parser sees one line.
fn join_soft_line_breaks(content: &str) -> Cow<'_, str> {
    if !content.to_ascii_uppercase().contains("QUOTED-PRINTABLE") {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len());
    let mut continuing = false;
    let mut quoted_printable = false;

    for line in content.lines() {
        if !continuing {
            quoted_printable = is_quoted_printable(line);
        }

        if quoted_printable && let Some(head) = line.strip_suffix('=') {
            out.push_str(head);
            continuing = true;
        } else {
            out.push_str(line);
            out.push_str("\r\n");
            continuing = false;
        }
    }

    Cow::Owned(out)
}

fn is_quoted_printable(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(head, _)| head.to_ascii_uppercase().contains("ENCODING=QUOTED-PRINTABLE"))
}

fn collect_vevents<'a>(component: &'a Component<'a>, out: &mut Vec<&'a Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
        return;
    }
    for child in &component.components {
        collect_vevents(child, out);
    }
}

fn to_raw_event(vevent: &Component) -> RawEvent {
    RawEvent {
        uid: text_value(vevent, "UID"),
        summary: vevent.find_prop("SUMMARY").map(text_field),
        start: vevent.find_prop("DTSTART").and_then(feed_time),
        end: vevent.find_prop("DTEND").and_then(feed_time),
        description: vevent.find_prop("DESCRIPTION").map(text_field),
        status: text_value(vevent, "STATUS"),
        location: text_value(vevent, "LOCATION"),
        url: text_value(vevent, "URL"),
    }
}

fn text_value(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
}

/// Quoted-printable properties are carried as `Encoded`, everything else as `Plain`.
fn text_field(prop: &Property) -> TextField {
    let value = unescape_text(prop.val.as_ref());

    let quoted_printable = prop.params.iter().any(|p| {
        p.key == "ENCODING"
            && p.val
                .as_ref()
                .is_some_and(|v| {
                    let v: &str = v.as_ref();
                    v.eq_ignore_ascii_case("QUOTED-PRINTABLE")
                })
    });

    if quoted_printable {
        TextField::Encoded(value)
    } else {
        TextField::Plain(value)
    }
}

fn feed_time(prop: &Property) -> Option<FeedTime> {
    match DatePerhapsTime::try_from(prop) {
        Ok(DatePerhapsTime::Date(d)) => Some(FeedTime::Date(d)),
        Ok(DatePerhapsTime::DateTime(cal_dt)) => Some(match cal_dt {
            CalendarDateTime::Utc(dt) => FeedTime::Utc(dt),
            CalendarDateTime::Floating(naive) => FeedTime::Floating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => FeedTime::Zoned {
                datetime: date_time,
                tzid,
            },
        }),
        Err(_) => {
            let value: &str = prop.val.as_ref();
            tracing::debug!(value, "unparseable date value");
            None
        }
    }
}

/// Reverse RFC 5545 text escaping: `\,` `\;` `\\` `\n`.
fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(',') | Some(';') | Some('\\') => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            Some('n') | Some('N') => {
                result.push('\n');
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}
