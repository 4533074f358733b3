use chrono::{DateTime, Utc};
use gitstats_api::{Commit, Contributor, OrgMember, OrgRepository, Release, StarredUser, User};

use crate::Result;

/// Where the raw GitHub data comes from
///
/// The GitHub provider implements this for real traffic; tests get a mock.
/// Every list method returns the complete, already-paginated listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StatsSource: Send + Sync {
    async fn releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>>;

    /// Stargazers grouped by upstream page, page 1 first
    async fn stargazer_pages(&self, owner: &str, repo: &str) -> Result<Vec<Vec<StarredUser>>>;

    /// One upstream stargazer page (oldest-first numbering)
    async fn stargazers_page(&self, owner: &str, repo: &str, page: u32) -> Result<Vec<StarredUser>>;

    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64>;

    async fn user(&self, login: &str) -> Result<User>;

    async fn org_repositories(&self, org: &str) -> Result<Vec<OrgRepository>>;

    async fn contributors(&self, owner: &str, repo: &str) -> Result<Vec<Contributor>>;

    async fn org_members(&self, org: &str) -> Result<Vec<OrgMember>>;

    async fn commits_since(&self, owner: &str, repo: &str, since: DateTime<Utc>) -> Result<Vec<Commit>>;
}

/// What to do when one item of a multi-item aggregation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Log it, count it, move on
    #[default]
    BestEffort,
    /// Fail the whole request
    FailFast,
}

impl FailureMode {
    pub fn from_best_effort(best_effort: bool) -> Self {
        if best_effort {
            FailureMode::BestEffort
        } else {
            FailureMode::FailFast
        }
    }
}
