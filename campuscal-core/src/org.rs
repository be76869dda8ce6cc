//! Hosting organization detection.
//!
//! Organizations are detected by running an ordered list of patterns over an
//! event's title, description and location. Registry order is priority order:
//! the first matching organization becomes the event's primary org.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::{CoreError, CoreResult};

/// Fallback organization used when no pattern matches.
pub const FALLBACK_ORG: &str = "Campus";

/// Built-in registry: (key, pattern) in priority order.
const DEFAULT_MATCHERS: &[(&str, &str)] = &[
    (
        "NSLS",
        r"nsls|national society of leadership and success|leadership training|induction|snt",
    ),
    ("WoCSA", r"wocsa|women of color student association"),
    ("ODK", r"omicron delta kappa|\bodk\b"),
    ("CSEI", r"center for student engagement and involvement|csei"),
    ("DIS", r"diversity and international services|\bdis\b"),
    ("BSU", r"black student union|\bbsu\b"),
    ("TitleIX", r"title ix|diversity equity and inclusion|\bdei\b"),
];

const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("NSLS", "var(--color-nsls-regent_st_blue)"),
    ("WoCSA", "var(--color-wocsa-peranopurp)"),
    ("ODK", "var(--color-odk-sinbad)"),
    ("CSEI", "var(--color-csei-zanah)"),
    ("DIS", "var(--color-dis-sidecar)"),
    ("BSU", "var(--color-bsu-mandys_pink)"),
    ("TitleIX", "var(--color-titleix-wewak)"),
    ("Multi", "var(--color-multi-vanilla_ice)"),
    (FALLBACK_ORG, "var(--color-satin_linen)"),
];

const DEFAULT_EMOJIS: &[(&str, &str)] = &[
    ("BSU", "✊🏿"),
    ("DIS", "🌍"),
    ("TitleIX", "🙌🏽"),
    ("ODK", "🌟"),
    ("NSLS", "👩🏾‍🎓"),
    ("WoCSA", "💜"),
    ("CSEI", "🤝"),
    (FALLBACK_ORG, "📣"),
];

/// One registry entry.
#[derive(Debug, Clone)]
pub struct OrgMatcher {
    pub key: String,
    pub pattern: Regex,
}

impl OrgMatcher {
    /// Compile a case-insensitive matcher.
    pub fn new(key: &str, pattern: &str) -> CoreResult<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CoreError::InvalidPattern {
                key: key.to_string(),
                source,
            })?;
        Ok(OrgMatcher {
            key: key.to_string(),
            pattern,
        })
    }
}

/// Result of classifying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub hosting_org: Vec<String>,
    pub primary_org: String,
}

/// Ordered pattern registry plus color and emoji tables.
#[derive(Debug, Clone)]
pub struct OrgClassifier {
    matchers: Vec<OrgMatcher>,
    colors: HashMap<String, String>,
    emojis: HashMap<String, String>,
}

impl OrgClassifier {
    /// Both display tables must contain a `"Campus"` entry.
    pub fn new(
        matchers: Vec<OrgMatcher>,
        colors: HashMap<String, String>,
        emojis: HashMap<String, String>,
    ) -> CoreResult<Self> {
        if !colors.contains_key(FALLBACK_ORG) || !emojis.contains_key(FALLBACK_ORG) {
            return Err(CoreError::MissingFallback(FALLBACK_ORG));
        }
        Ok(OrgClassifier {
            matchers,
            colors,
            emojis,
        })
    }

    pub fn matchers(&self) -> &[OrgMatcher] {
        &self.matchers
    }

    pub fn classify(&self, title: &str, description: &str, location: &str) -> Classification {
        let searchable = format!("{title} {description} {location}")
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut hosting_org: Vec<String> = self
            .matchers
            .iter()
            .filter(|m| m.pattern.is_match(&searchable))
            .map(|m| m.key.clone())
            .collect();

        if hosting_org.is_empty() {
            hosting_org.push(FALLBACK_ORG.to_string());
        }

        let primary_org = hosting_org[0].clone();
        Classification {
            hosting_org,
            primary_org,
        }
    }

    pub fn color_of(&self, key: &str) -> &str {
        lookup(&self.colors, key)
    }

    pub fn emoji_of(&self, key: &str) -> &str {
        lookup(&self.emojis, key)
    }

    /// Emoji tokens for every key, space-joined.
    pub fn emojis_of(&self, keys: &[String]) -> String {
        keys.iter()
            .map(|k| self.emoji_of(k))
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The built-in color table, for callers layering their own tokens on top.
    pub fn default_colors() -> HashMap<String, String> {
        to_table(DEFAULT_COLORS)
    }

    pub fn default_emojis() -> HashMap<String, String> {
        to_table(DEFAULT_EMOJIS)
    }
}

impl Default for OrgClassifier {
    fn default() -> Self {
        let matchers = DEFAULT_MATCHERS
            .iter()
            .map(|(key, pattern)| OrgMatcher::new(key, pattern).expect("built-in org patterns are valid"))
            .collect();

        OrgClassifier {
            matchers,
            colors: Self::default_colors(),
            emojis: Self::default_emojis(),
        }
    }
}

fn lookup<'a>(table: &'a HashMap<String, String>, key: &str) -> &'a str {
    table
        .get(key)
        .or_else(|| table.get(FALLBACK_ORG))
        .map(String::as_str)
        .unwrap_or_default()
}

fn to_table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_compiles_every_pattern() {
        assert_eq!(
            OrgClassifier::default().matchers().len(),
            DEFAULT_MATCHERS.len()
        );
    }

    #[test]
    fn test_classify_detects_primary_org() {
        let classifier = OrgClassifier::default();
        let result = classifier.classify("NSLS induction ceremony", "", "");
        assert_eq!(result.primary_org, "NSLS");
        assert_eq!(result.hosting_org, vec!["NSLS"]);
    }

    #[test]
    fn test_classify_falls_back_to_campus() {
        let classifier = OrgClassifier::default();
        let result = classifier.classify("unrelated lecture", "", "");
        assert_eq!(result.hosting_org, vec!["Campus"]);
        assert_eq!(result.primary_org, "Campus");
    }

    #[test]
    fn test_classify_keeps_registry_order() {
        let classifier = OrgClassifier::default();
        // BSU appears first in the text but NSLS has higher priority
        let result = classifier.classify(
            "Black Student Union mixer",
            "co-hosted with the National Society of Leadership and Success",
            "",
        );
        assert_eq!(result.hosting_org, vec!["NSLS", "BSU"]);
        assert_eq!(result.primary_org, "NSLS");
    }

    #[test]
    fn test_classify_uses_location_and_word_boundaries() {
        let classifier = OrgClassifier::default();
        assert_eq!(
            classifier.classify("Game night", "", "ODK   lounge").hosting_org,
            vec!["ODK"]
        );
        // "discussion" must not trigger the \bdis\b pattern
        assert_eq!(
            classifier.classify("Panel discussion", "", "").hosting_org,
            vec!["Campus"]
        );
    }

    #[test]
    fn test_display_tokens_fall_back_to_campus() {
        let classifier = OrgClassifier::default();
        assert_eq!(classifier.color_of("NSLS"), "var(--color-nsls-regent_st_blue)");
        assert_eq!(classifier.color_of("Unknown"), "var(--color-satin_linen)");
        assert_eq!(classifier.emoji_of("Unknown"), "📣");
        assert_eq!(
            classifier.emojis_of(&["BSU".to_string(), "DIS".to_string()]),
            "✊🏿 🌍"
        );
    }

    #[test]
    fn test_new_requires_fallback_entries() {
        let matchers = vec![OrgMatcher::new("Chess", "chess club").unwrap()];
        let result = OrgClassifier::new(matchers, HashMap::new(), OrgClassifier::default_emojis());
        assert!(matches!(result, Err(CoreError::MissingFallback("Campus"))));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = OrgMatcher::new("Broken", "(unclosed").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { ref key, .. } if key == "Broken"));
    }

    #[test]
    fn test_custom_registry() {
        let matchers = vec![OrgMatcher::new("Chess", r"\bchess\b").unwrap()];
        let classifier = OrgClassifier::new(
            matchers,
            OrgClassifier::default_colors(),
            OrgClassifier::default_emojis(),
        )
        .unwrap();
        assert_eq!(classifier.classify("CHESS tournament", "", "").primary_org, "Chess");
        assert_eq!(classifier.classify("NSLS meeting", "", "").primary_org, "Campus");
    }
}
