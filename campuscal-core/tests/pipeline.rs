use campuscal_core::ics::parse_feed;
use campuscal_core::normalize::EventNormalizer;
use campuscal_core::org::OrgClassifier;
use campuscal_core::pipeline::build_events;
use campuscal_core::snapshot::Snapshot;
use campuscal_core::split::{ActionableRules, currently_live, upcoming};
use chrono::{TimeZone, Utc};

const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Campus//Events//EN\r\n\
BEGIN:VEVENT\r\n\
UID:induction@campus\r\n\
SUMMARY:NSLS Induction Ceremony\r\n\
DTSTART:20250320T220000Z\r\n\
DTEND:20250321T000000Z\r\n\
DESCRIPTION:Celebrate new members.\\n---\\nEvent Details: https://example.edu/e/1\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:scholarship@campus\r\n\
SUMMARY:Apply now for the BSU scholarship\r\n\
DTSTART:20250301T140000Z\r\n\
DTEND:20250415T040000Z\r\n\
LOCATION:Online\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:lecture@campus\r\n\
SUMMARY:Guest lecture\r\n\
DTSTART;TZID=America/New_York:20250410T180000\r\n\
DTEND;TZID=America/New_York:20250410T193000\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:cancelled@campus\r\n\
SUMMARY:Cancelled mixer\r\n\
DTSTART:20250322T220000Z\r\n\
STATUS:CANCELLED\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:broken@campus\r\n\
SUMMARY:No start time\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn normalizer() -> EventNormalizer {
    EventNormalizer::new(OrgClassifier::default(), chrono_tz::UTC)
}

#[test]
fn test_feed_to_snapshot() {
    let records = parse_feed(FEED).expect("Should parse feed");
    let built = build_events(&records, &normalizer());

    assert_eq!(built.cancelled, 1);
    assert_eq!(built.skipped, 1);

    let ids: Vec<&str> = built.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["scholarship@campus", "induction@campus", "lecture@campus"]);

    let induction = &built.events[1];
    assert_eq!(induction.primary_org, "NSLS");
    assert_eq!(induction.description, "Celebrate new members.");
    assert_eq!(induction.url.as_deref(), Some("https://example.edu/e/1"));

    let lecture = &built.events[2];
    assert_eq!(lecture.start, Utc.with_ymd_and_hms(2025, 4, 10, 22, 0, 0).unwrap());
    assert_eq!(lecture.hosting_org, vec!["Campus"]);

    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("events.json"));

    let first = snapshot.commit(&built.events).expect("Should commit");
    assert!(first.written);
    assert_eq!(first.diff.added.len(), 3);

    // Same feed again: nothing to write
    let rebuilt = build_events(&parse_feed(FEED).unwrap(), &normalizer());
    let second = snapshot.commit(&rebuilt.events).expect("Should commit");
    assert!(!second.written);
    assert!(second.diff.is_empty());
}

#[test]
fn test_snapshot_feeds_split() {
    let records = parse_feed(FEED).unwrap();
    let events = build_events(&records, &normalizer()).events;

    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("events.json"));
    snapshot.commit(&events).unwrap();
    let persisted = snapshot.load();
    assert_eq!(persisted, events);

    let now = Utc.with_ymd_and_hms(2025, 3, 25, 12, 0, 0).unwrap();
    let split = ActionableRules::default().split(persisted.clone(), now);

    let actionable: Vec<&str> = split.actionable.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(actionable, vec!["scholarship@campus"]);
    assert_eq!(split.ordinary.len(), 2);

    let live = currently_live(&split.actionable, now);
    assert_eq!(live.len(), 1);

    let next: Vec<&str> = upcoming(&split.ordinary, now)
        .into_iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(next, vec!["lecture@campus"]);

    // After the application window closes it becomes an ordinary event
    let later = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let split = ActionableRules::default().split(persisted, later);
    assert!(split.actionable.is_empty());
}
