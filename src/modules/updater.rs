// Release check against a GitHub-style "latest release" feed.

use std::cmp::Ordering;
use std::time::Duration;

use serde::Deserialize;

use crate::error::UpdateError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Available(Release),
    UpToDate,
}

pub trait ReleaseSource {
    fn latest(&self) -> Result<Release, UpdateError>;
}

/// Reads the latest release from the GitHub REST API.
pub struct GithubReleases {
    feed: String,
}

impl GithubReleases {
    pub fn new(feed: impl Into<String>) -> Self {
        Self { feed: feed.into() }
    }
}

impl ReleaseSource for GithubReleases {
    fn latest(&self) -> Result<Release, UpdateError> {
        // The GitHub API rejects requests without a user agent.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("chat-fusion/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        let release = client.get(&self.feed).send()?.error_for_status()?.json::<Release>()?;
        Ok(release)
    }
}

/// Parses `v1.2.3`, `1.2` or `1.2.3-beta.1` into numeric components.
/// Pre-release and build suffixes are ignored.
pub fn parse_version(raw: &str) -> Option<Vec<u64>> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    let core = trimmed.split(['-', '+']).next()?;
    if core.is_empty() {
        return None;
    }
    core.split('.').map(|part| part.parse::<u64>().ok()).collect()
}

fn compare(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    let at = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    (0..len)
        .map(|i| at(a, i).cmp(&at(b, i)))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// True when `latest` is a strictly higher version than `current`.
pub fn is_newer(current: &str, latest: &str) -> Result<bool, UpdateError> {
    let current = parse_version(current).ok_or_else(|| UpdateError::Version(current.to_string()))?;
    let latest = parse_version(latest).ok_or_else(|| UpdateError::Version(latest.to_string()))?;
    Ok(compare(&latest, &current) == Ordering::Greater)
}

pub fn check<S: ReleaseSource + ?Sized>(source: &S, current: &str) -> Result<UpdateStatus, UpdateError> {
    let release = source.latest()?;
    log::info!("[Updater] Latest release is {} (running {})", release.tag_name, current);
    if is_newer(current, &release.tag_name)? {
        Ok(UpdateStatus::Available(release))
    } else {
        Ok(UpdateStatus::UpToDate)
    }
}
