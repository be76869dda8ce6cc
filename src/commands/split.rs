use std::path::Path;

use anyhow::{Context, Result};
use campuscal_core::split::{currently_live, upcoming};
use chrono::{DateTime, Utc};

use super::resolve_snapshot;
use crate::config::Config;
use crate::render::render_section;

/// Parse `--now`, defaulting to the current time.
fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid --now '{}': expected RFC 3339, e.g. 2025-03-20T15:00:00Z", s)),
        None => Ok(Utc::now()),
    }
}

pub fn run(config: &Config, snapshot: Option<&Path>, now: Option<&str>, json: bool) -> Result<()> {
    let now = resolve_now(now)?;
    let rules = config.actionable_rules()?;
    let snapshot = resolve_snapshot(config, snapshot);

    let split = rules.split(snapshot.load(), now);
    let live = currently_live(&split.actionable, now);
    let next = upcoming(&split.ordinary, now);

    if json {
        let output = serde_json::json!({
            "calendar": split.ordinary,
            "applications": split.actionable,
            "liveApplications": live,
            "upcoming": next,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let calendar: Vec<_> = split.ordinary.iter().collect();
    let applications: Vec<_> = split.actionable.iter().collect();

    println!("{}", render_section("📅 Calendar", &calendar));
    println!();
    println!("{}", render_section("📝 Applications", &applications));
    println!();
    println!("{}", render_section("🟢 Open now", &live));
    println!();
    println!("{}", render_section("⏭️  Upcoming", &next));

    Ok(())
}
