// Request-level orchestration: fetch through a StatsSource, fold with the aggregators
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::contributors::{activity_window_start, collect_logins, ActivityTally, ACTIVITY_WINDOW_LABEL};
use crate::downloads::calculate_download_stats;
use crate::models::{
    ActiveContributorsReport, DownloadStats, MultiRepoStarHistory, OrganizationStats, StargazerPage,
};
use crate::repo_url::RepoRef;
use crate::source::{FailureMode, StatsSource};
use crate::star_history::build_star_history;
use crate::stargazers::{reverse_page, sort_newest_first, to_stargazer};
use crate::Result;

/// Computes every stats report from live upstream data
///
/// Nothing is cached and nothing is shared between calls. Upstream calls are
/// made one after another, in the order the report needs them.
pub struct StatsService<S> {
    source: S,
    failure_mode: FailureMode,
}

impl<S: StatsSource> StatsService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            failure_mode: FailureMode::default(),
        }
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub async fn download_stats(&self, repo: &RepoRef) -> Result<DownloadStats> {
        let releases = self.source.releases(&repo.owner, &repo.name).await?;
        debug!(repo = %repo, releases = releases.len(), "Fetched releases");

        Ok(calculate_download_stats(repo.to_string(), releases))
    }

    /// Star histories in the same order as `repos`; the first failure wins
    pub async fn star_history(&self, repos: &[RepoRef]) -> Result<MultiRepoStarHistory> {
        let mut result = MultiRepoStarHistory {
            repositories: Vec::with_capacity(repos.len()),
        };

        for repo in repos {
            let pages = self.source.stargazer_pages(&repo.owner, &repo.name).await?;
            debug!(repo = %repo, pages = pages.len(), "Fetched stargazers");
            result.repositories.push(build_star_history(repo.to_string(), &pages));
        }

        Ok(result)
    }

    /// Distinct contributors across every public repository of `org`.
    ///
    /// All or nothing: one failing repository fails the report.
    pub async fn org_contributors(&self, org: &str) -> Result<OrganizationStats> {
        let repos = self.source.org_repositories(org).await?;
        let mut logins = HashSet::new();

        for repo in &repos {
            let contributors = self.source.contributors(org, &repo.name).await?;
            collect_logins(&mut logins, contributors);
        }

        Ok(OrganizationStats {
            org_name: org.to_string(),
            total_repos: repos.len(),
            total_contributors: logins.len(),
        })
    }

    /// Logins to leave out of activity reports.
    ///
    /// GitHub answers 404 when `owner` is a user rather than an organization;
    /// there's nobody to exclude in that case.
    async fn member_logins(&self, owner: &str) -> Result<HashSet<String>> {
        match self.source.org_members(owner).await {
            Ok(members) => Ok(members.into_iter().map(|m| m.login).collect()),
            Err(e) if e.upstream_status() == Some(404) => {
                debug!(owner, "Owner has no organization members");
                Ok(HashSet::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn active_contributors_for_repo(
        &self,
        repo: &RepoRef,
        now: DateTime<Utc>,
    ) -> Result<ActiveContributorsReport> {
        let members = self.member_logins(&repo.owner).await?;
        let since = activity_window_start(now);
        let commits = self.source.commits_since(&repo.owner, &repo.name, since).await?;

        let mut tally = ActivityTally::new();
        tally.record_commits(&commits, &members);

        Ok(ActiveContributorsReport {
            repo_name: repo.to_string(),
            time_range: ACTIVITY_WINDOW_LABEL.to_string(),
            active_contributors: tally.into_ranked(),
            skipped_repos: 0,
        })
    }

    /// Org-wide activity. Repositories whose commits can't be fetched are
    /// skipped in best-effort mode and fail the report otherwise.
    pub async fn active_contributors_for_org(
        &self,
        org: &str,
        now: DateTime<Utc>,
    ) -> Result<ActiveContributorsReport> {
        let members = self.member_logins(org).await?;
        let repos = self.source.org_repositories(org).await?;
        let since = activity_window_start(now);

        let mut tally = ActivityTally::new();
        let mut skipped_repos = 0;

        for repo in &repos {
            match self.source.commits_since(org, &repo.name, since).await {
                Ok(commits) => tally.record_commits(&commits, &members),
                Err(e) if self.failure_mode == FailureMode::BestEffort => {
                    warn!(org, repo = %repo.name, error = %e, "Skipping repository, commits unavailable");
                    skipped_repos += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ActiveContributorsReport {
            repo_name: org.to_string(),
            time_range: ACTIVITY_WINDOW_LABEL.to_string(),
            active_contributors: tally.into_ranked(),
            skipped_repos,
        })
    }

    /// One newest-first page of stargazers with full profiles.
    ///
    /// Costs one repository lookup, one listing page and one user lookup per
    /// stargazer on that page.
    pub async fn stargazer_page(&self, owner: &str, repo: &str, page: u32) -> Result<StargazerPage> {
        let page = page.max(1);
        let total_count = self.source.stargazer_count(owner, repo).await?;
        let upstream_page = reverse_page(total_count, page);
        debug!(owner, repo, page, upstream_page, total_count, "Fetching stargazer page");

        let entries = self.source.stargazers_page(owner, repo, upstream_page).await?;

        let mut stargazers = Vec::with_capacity(entries.len());
        let mut skipped_stargazers = 0;

        for entry in &entries {
            match self.source.user(&entry.user.login).await {
                Ok(user) => stargazers.push(to_stargazer(entry, user)),
                Err(e) if self.failure_mode == FailureMode::BestEffort => {
                    warn!(login = %entry.user.login, error = %e, "Dropping stargazer, profile unavailable");
                    skipped_stargazers += 1;
                }
                Err(e) => return Err(e),
            }
        }

        sort_newest_first(&mut stargazers);

        let has_more = upstream_page > 1;
        Ok(StargazerPage {
            stargazers,
            has_more,
            total_count,
            current_page: page,
            next_page: if has_more { page.checked_add(1) } else { None },
            skipped_stargazers,
        })
    }
}
