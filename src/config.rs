//! campuscal configuration.
//!
//! Read from `~/.config/campuscal/config.toml` (or `--config`), then overlaid by
//! `CAMPUSCAL_*` environment variables. Every key is optional.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campuscal_core::org::{OrgClassifier, OrgMatcher};
use campuscal_core::split::{ActionableRules, DEFAULT_KEYWORDS, DEFAULT_TITLE_PATTERN};
use chrono_tz::Tz;
use config::{Config as ConfigBuilder, Environment, File};
use serde::Deserialize;

static DEFAULT_SNAPSHOT_PATH: &str = "events.json";

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Feed URL (http, https, webcal) or path to a local .ics file
    pub feed: Option<String>,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Zone for floating times and all-day dates in the feed
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Replaces the built-in organization registry when non-empty
    #[serde(default)]
    pub orgs: Vec<OrgEntry>,

    #[serde(default)]
    pub actionable: ActionableConfig,
}

/// One `[[orgs]]` entry. Entries without a pattern only contribute display
/// tokens (e.g. for the "Campus" fallback).
#[derive(Debug, Clone, Deserialize)]
pub struct OrgEntry {
    pub key: String,
    pub pattern: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionableConfig {
    pub title_pattern: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("campuscal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing default config file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let config: Config = ConfigBuilder::builder()
            .add_source(File::from(path.clone()).required(required))
            .add_source(Environment::with_prefix("CAMPUSCAL"))
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Ok(config)
    }

    /// Snapshot path with `~` expanded.
    pub fn snapshot_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.snapshot_path.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }

    /// Organization classifier: built-in registry, or the configured one.
    pub fn classifier(&self) -> Result<OrgClassifier> {
        if self.orgs.is_empty() {
            return Ok(OrgClassifier::default());
        }

        let mut colors: HashMap<String, String> = OrgClassifier::default_colors();
        let mut emojis: HashMap<String, String> = OrgClassifier::default_emojis();
        let mut matchers = Vec::new();

        for entry in &self.orgs {
            if let Some(pattern) = &entry.pattern {
                matchers.push(OrgMatcher::new(&entry.key, pattern)?);
            }
            if let Some(color) = &entry.color {
                colors.insert(entry.key.clone(), color.clone());
            }
            if let Some(emoji) = &entry.emoji {
                emojis.insert(entry.key.clone(), emoji.clone());
            }
        }

        Ok(OrgClassifier::new(matchers, colors, emojis)?)
    }

    pub fn actionable_rules(&self) -> Result<ActionableRules> {
        let cfg = &self.actionable;
        if cfg.title_pattern.is_none() && cfg.keywords.is_none() {
            return Ok(ActionableRules::default());
        }

        let title_pattern = cfg.title_pattern.as_deref().unwrap_or(DEFAULT_TITLE_PATTERN);
        let keywords = cfg
            .keywords
            .clone()
            .unwrap_or_else(|| DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect());

        Ok(ActionableRules::new(title_pattern, keywords)?)
    }
}
