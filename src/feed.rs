//! Feed source: fetches the raw ICS text the pipeline runs on.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Request timeout for remote feeds
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the calendar feed comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Remote(Url),
    File(PathBuf),
}

impl FeedSource {
    /// Parse a feed location. `webcal://` is fetched over https; anything that
    /// is not an http(s)/webcal URL is treated as a file path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();

        let Ok(url) = Url::parse(location) else {
            return Ok(FeedSource::File(PathBuf::from(location)));
        };

        match url.scheme() {
            "http" | "https" => Ok(FeedSource::Remote(url)),
            "webcal" | "webcals" => {
                // set_scheme() can't turn a non-special scheme into https, so re-parse
                let rest = &url.as_str()[url.scheme().len()..];
                let https = Url::parse(&format!("https{}", rest))
                    .with_context(|| format!("Cannot convert feed URL to https: {}", location))?;
                Ok(FeedSource::Remote(https))
            }
            "file" => url
                .to_file_path()
                .map(FeedSource::File)
                .map_err(|_| anyhow::anyhow!("Invalid file URL: {}", location)),
            _ => Ok(FeedSource::File(PathBuf::from(location))),
        }
    }

    /// Fetch the feed text.
    pub async fn fetch(&self) -> Result<String> {
        match self {
            FeedSource::Remote(url) => {
                tracing::info!(%url, "fetching feed");

                let client = reqwest::Client::builder()
                    .timeout(FETCH_TIMEOUT)
                    .build()
                    .context("Failed to build HTTP client")?;

                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch feed from {}", url))?
                    .error_for_status()
                    .with_context(|| format!("Feed request to {} failed", url))?;

                response
                    .text()
                    .await
                    .with_context(|| format!("Failed to read feed body from {}", url))
            }
            FeedSource::File(path) => {
                tracing::info!(path = %path.display(), "reading feed");
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read feed file {}", path.display()))
            }
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webcal_becomes_https() {
        let source = FeedSource::parse("webcal://involvement.example.edu/ics?group_ids=1,2").unwrap();
        assert_eq!(
            source,
            FeedSource::Remote(Url::parse("https://involvement.example.edu/ics?group_ids=1,2").unwrap())
        );
    }

    #[test]
    fn test_http_urls_are_remote() {
        assert!(matches!(
            FeedSource::parse("http://example.edu/feed.ics").unwrap(),
            FeedSource::Remote(_)
        ));
    }

    #[test]
    fn test_paths_are_files() {
        assert_eq!(
            FeedSource::parse("fixtures/feed.ics").unwrap(),
            FeedSource::File(PathBuf::from("fixtures/feed.ics"))
        );
        assert_eq!(
            FeedSource::parse("/tmp/feed.ics").unwrap(),
            FeedSource::File(PathBuf::from("/tmp/feed.ics"))
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.ics");
        std::fs::write(&path, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();

        let text = FeedSource::File(path).fetch().await.unwrap();
        assert!(text.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FeedSource::File(dir.path().join("missing.ics")).fetch().await.is_err());
    }
}
