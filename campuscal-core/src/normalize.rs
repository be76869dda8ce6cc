//! Raw feed record → canonical `Event`.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::event::{Event, FeedTime, RawEvent};
use crate::org::OrgClassifier;
use crate::text::{self, TextField};

/// Title used when the feed gives none.
pub const FALLBACK_TITLE: &str = "No title";

/// Separates the human description from the feed's trailing details block.
const DETAILS_SEPARATOR: &str = "---";

static EVENT_DETAILS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)event details:\s*(\S+)").expect("event details pattern is valid")
});

/// Builds canonical events from raw feed records.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    classifier: OrgClassifier,
    default_tz: Tz,
}

impl EventNormalizer {
    pub fn new(classifier: OrgClassifier, default_tz: Tz) -> Self {
        EventNormalizer {
            classifier,
            default_tz,
        }
    }

    pub fn normalize_event(&self, raw: &RawEvent) -> CoreResult<Event> {
        let title = raw
            .summary
            .as_ref()
            .map(|s| text::normalize(&s.resolve()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        let start = match &raw.start {
            Some(time) => self.resolve(time, "start")?,
            None => return Err(CoreError::MissingStart { title }),
        };

        let end = match &raw.end {
            Some(time) => match self.resolve(time, "end") {
                Ok(end) => Some(end),
                Err(e) => {
                    tracing::warn!(title, error = %e, "ignoring unusable end time");
                    None
                }
            },
            None => None,
        };

        let id = raw
            .uid
            .as_deref()
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(String::from)
            .unwrap_or_else(|| synthesize_id(&title, &start));

        let (description, details_url) = split_description(raw.description.as_ref());
        let url = details_url.or_else(|| {
            raw.url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
        });

        let location = text::normalize_opt(raw.location.as_deref());
        let orgs = self.classifier.classify(&title, &description, &location);

        Ok(Event {
            primary_org_color: self.classifier.color_of(&orgs.primary_org).to_string(),
            primary_org_emoji: self.classifier.emoji_of(&orgs.primary_org).to_string(),
            org_emojis: self.classifier.emojis_of(&orgs.hosting_org),
            id,
            title,
            start,
            end,
            description,
            url,
            hosting_org: orgs.hosting_org,
            primary_org: orgs.primary_org,
        })
    }

    fn resolve(&self, time: &FeedTime, field: &'static str) -> CoreResult<DateTime<Utc>> {
        time.to_utc(self.default_tz)
            .ok_or_else(|| CoreError::UnresolvableTime {
                field,
                value: time.to_string(),
            })
    }
}

fn synthesize_id(title: &str, start: &DateTime<Utc>) -> String {
    format!("{}-{}", title, start.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Split a raw description into (normalized description, details URL).
fn split_description(raw: Option<&TextField>) -> (String, Option<String>) {
    let Some(raw) = raw else {
        return (String::new(), None);
    };
    let resolved = raw.resolve();

    match resolved.split_once(DETAILS_SEPARATOR) {
        Some((body, details)) => {
            let url = EVENT_DETAILS_URL
                .captures(details)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
            (text::normalize(body), url)
        }
        None => (text::normalize(&resolved), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normalizer() -> EventNormalizer {
        EventNormalizer::new(OrgClassifier::default(), chrono_tz::UTC)
    }

    fn raw(summary: &str) -> RawEvent {
        RawEvent {
            uid: Some("evt-1@feed".to_string()),
            summary: Some(TextField::Plain(summary.to_string())),
            start: Some(FeedTime::Utc(Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap())),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalizes_title_and_classifies() {
        let event = normalizer()
            .normalize_event(&raw("  NSLS \r\n induction  "))
            .unwrap();
        assert_eq!(event.id, "evt-1@feed");
        assert_eq!(event.title, "NSLS induction");
        assert_eq!(event.primary_org, "NSLS");
        assert_eq!(event.primary_org_color, "var(--color-nsls-regent_st_blue)");
        assert_eq!(event.primary_org_emoji, "👩🏾‍🎓");
        assert_eq!(event.end, None);
        assert_eq!(event.description, "");
        assert_eq!(event.url, None);
    }

    #[test]
    fn test_encoded_title_is_decoded() {
        let mut record = raw("");
        record.summary = Some(TextField::Encoded("Caf=C3=A9 =26 Chat".to_string()));
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.title, "Café & Chat");
    }

    #[test]
    fn test_missing_title_falls_back() {
        let mut record = raw("   ");
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.title, "No title");

        record.summary = None;
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.title, "No title");
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let mut record = raw("Orientation");
        record.start = None;
        let err = normalizer().normalize_event(&record).unwrap_err();
        assert!(matches!(err, CoreError::MissingStart { ref title } if title == "Orientation"));
    }

    #[test]
    fn test_id_is_synthesized_without_uid() {
        let mut record = raw("Orientation");
        record.uid = None;
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.id, "Orientation-2025-03-20T15:00:00Z");

        record.uid = Some("  ".to_string());
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.id, "Orientation-2025-03-20T15:00:00Z");
    }

    #[test]
    fn test_details_url_is_extracted_after_separator() {
        let mut record = raw("Scholarship info session");
        record.description = Some(TextField::Plain(
            "Learn about\n\nfunding.\n---\nevent details:   https://example.edu/e/42 more".into(),
        ));
        record.url = Some("https://example.edu/fallback".to_string());

        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.description, "Learn about funding.");
        assert_eq!(event.url.as_deref(), Some("https://example.edu/e/42"));
    }

    #[test]
    fn test_explicit_url_used_without_details() {
        let mut record = raw("Study hall");
        record.description = Some(TextField::Plain("Bring notes".into()));
        record.url = Some("https://example.edu/study".to_string());
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.description, "Bring notes");
        assert_eq!(event.url.as_deref(), Some("https://example.edu/study"));

        // Separator present but no details line: keep the explicit URL
        record.description = Some(TextField::Plain("Bring notes --- see you".into()));
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.description, "Bring notes");
        assert_eq!(event.url.as_deref(), Some("https://example.edu/study"));
    }

    #[test]
    fn test_description_decoding_follows_field_variant() {
        let mut record = raw("Fundraiser");
        record.description = Some(TextField::Plain("Raise 50=25 more".into()));
        assert_eq!(
            normalizer().normalize_event(&record).unwrap().description,
            "Raise 50=25 more"
        );

        record.description = Some(TextField::Encoded("Raise 50=25 more".into()));
        assert_eq!(
            normalizer().normalize_event(&record).unwrap().description,
            "Raise 50% more"
        );
    }

    #[test]
    fn test_location_contributes_to_classification() {
        let mut record = raw("Movie night");
        record.location = Some("Black Student Union office".to_string());
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.hosting_org, vec!["BSU"]);
        assert_eq!(event.org_emojis, "✊🏿");
    }

    #[test]
    fn test_unresolvable_end_is_dropped() {
        let mut record = raw("Spring forward party");
        // 02:30 does not exist in New York on 2025-03-09
        record.end = Some(FeedTime::Zoned {
            datetime: chrono::NaiveDate::from_ymd_opt(2025, 3, 9)
                .unwrap()
                .and_hms_opt(2, 30, 0)
                .unwrap(),
            tzid: "America/New_York".to_string(),
        });
        let event = normalizer().normalize_event(&record).unwrap();
        assert_eq!(event.end, None);
    }
}
