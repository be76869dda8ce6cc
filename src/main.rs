mod commands;
mod config;
mod feed;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "campuscal")]
#[command(about = "Turn a campus events feed into a stable, classified JSON snapshot")]
struct Cli {
    /// Config file (defaults to ~/.config/campuscal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging and full change listings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and update the snapshot
    Sync {
        /// Feed URL (http, https, webcal) or .ics path
        #[arg(long)]
        feed: Option<String>,

        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Show what a sync would change, without writing
    Status {
        /// Feed URL (http, https, webcal) or .ics path
        #[arg(long)]
        feed: Option<String>,

        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// List calendar events and open applications from the snapshot
    Split {
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Evaluate as of this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Show which organizations an event would be attributed to
    Classify {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync { feed, snapshot } => {
            commands::sync::run(&config, feed.as_deref(), snapshot.as_deref()).await
        }
        Commands::Status { feed, snapshot } => {
            commands::status::run(&config, feed.as_deref(), snapshot.as_deref(), cli.verbose).await
        }
        Commands::Split { snapshot, now, json } => {
            commands::split::run(&config, snapshot.as_deref(), now.as_deref(), json)
        }
        Commands::Classify {
            title,
            description,
            location,
        } => commands::classify::run(&config, &title, description.as_deref(), location.as_deref()),
    }
}
