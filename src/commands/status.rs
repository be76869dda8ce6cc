use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use super::{build_from_feed, resolve_snapshot};
use crate::config::Config;
use crate::render::render_outcome;

/// Same as sync, but never writes the snapshot.
pub async fn run(config: &Config, feed: Option<&str>, snapshot: Option<&Path>, verbose: bool) -> Result<()> {
    let events = build_from_feed(config, feed).await?;
    let snapshot = resolve_snapshot(config, snapshot);

    let outcome = snapshot.preview(&events)?;

    println!("📅 {}", snapshot.path().display());
    println!("{}", render_outcome(&outcome, verbose));

    if outcome.written {
        println!();
        println!("{}", "Run `campuscal sync` to write these changes.".dimmed());
    }

    Ok(())
}
