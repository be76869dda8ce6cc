use std::path::Path;

use anyhow::Result;

use super::{build_from_feed, resolve_snapshot};
use crate::config::Config;
use crate::render::render_change_log;

pub async fn run(config: &Config, feed: Option<&str>, snapshot: Option<&Path>) -> Result<()> {
    let events = build_from_feed(config, feed).await?;
    let snapshot = resolve_snapshot(config, snapshot);

    let outcome = snapshot.commit(&events)?;

    if outcome.written {
        tracing::info!(path = %snapshot.path().display(), changes = outcome.diff.len(), "snapshot updated");
    }

    // Change log goes to stderr so stdout stays clean for scripting
    eprintln!("📅 {}", snapshot.path().display());
    eprintln!("{}", render_change_log(&outcome));

    Ok(())
}
