pub mod classify;
pub mod split;
pub mod status;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campuscal_core::Event;
use campuscal_core::ics::parse_feed;
use campuscal_core::normalize::EventNormalizer;
use campuscal_core::pipeline::{BuildOutcome, build_events};
use campuscal_core::snapshot::Snapshot;

use crate::config::Config;
use crate::feed::FeedSource;

/// Feed location from `--feed`, falling back to the config.
fn resolve_feed(config: &Config, feed: Option<&str>) -> Result<FeedSource> {
    let location = feed.or(config.feed.as_deref()).context(
        "No feed configured.\n\n\
        Pass one with:\n  \
        campuscal sync --feed <url-or-path>\n\n\
        or set `feed` in the config file",
    )?;

    FeedSource::parse(location)
}

/// Snapshot from `--snapshot`, falling back to the config.
pub fn resolve_snapshot(config: &Config, snapshot: Option<&Path>) -> Snapshot {
    let path: PathBuf = match snapshot {
        Some(p) => p.to_path_buf(),
        None => config.snapshot_path(),
    };
    Snapshot::new(path)
}

/// Fetch, parse and normalize the feed into the candidate event set.
pub async fn build_from_feed(config: &Config, feed: Option<&str>) -> Result<Vec<Event>> {
    let source = resolve_feed(config, feed)?;
    let content = source.fetch().await?;

    let records = parse_feed(&content).with_context(|| format!("Failed to parse feed from {}", source))?;

    let normalizer = EventNormalizer::new(config.classifier()?, config.timezone()?);
    let BuildOutcome {
        events,
        cancelled,
        skipped,
    } = build_events(&records, &normalizer);

    tracing::info!(
        records = records.len(),
        events = events.len(),
        cancelled,
        skipped,
        "normalized feed"
    );

    Ok(events)
}
