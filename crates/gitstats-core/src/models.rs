use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Download numbers for a single release asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetStats {
    pub name: String,
    pub download_count: u64,
}

/// Per-release totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDownloadStats {
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
    pub total_downloads: u64,
    pub assets: Vec<AssetStats>,
}

/// Download totals across every release of a repository, newest release first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadStats {
    pub repo_name: String,
    pub total_downloads: u64,
    pub releases: Vec<ReleaseDownloadStats>,
}

/// Stars at a specific point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarPoint {
    pub date: DateTime<Utc>,
    pub stars: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarHistory {
    pub repo_name: String,
    pub history: Vec<StarPoint>,
}

/// Star history for several repositories, in request order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MultiRepoStarHistory {
    pub repositories: Vec<StarHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrganizationStats {
    pub org_name: String,
    pub total_repos: usize,
    pub total_contributors: usize,
}

/// Someone outside the organization who committed within the window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveContributor {
    pub login: String,
    pub contributions: u64,
    pub last_active_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveContributorsReport {
    /// `owner/repo` for single repositories, the org name otherwise
    pub repo_name: String,
    pub time_range: String,
    pub active_contributors: Vec<ActiveContributor>,
    /// Repositories whose commits couldn't be fetched (org-wide, best-effort only)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped_repos: usize,
}

/// A stargazer with their profile details filled in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stargazer {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub starred_at: DateTime<Utc>,
}

/// One page of stargazers, newest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StargazerPage {
    pub stargazers: Vec<Stargazer>,
    pub has_more: bool,
    pub total_count: u64,
    pub current_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    /// Stargazers dropped because their profile lookup failed
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped_stargazers: usize,
}
