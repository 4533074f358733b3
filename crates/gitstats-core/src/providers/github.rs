// GitHub provider implementation - bridges API client with StatsSource trait
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gitstats_api::{Commit, Contributor, GitHubClient, OrgMember, OrgRepository, Release, StarredUser, User};

use crate::{source::StatsSource, Result};

/// Wrapper around GitHubClient that implements StatsSource
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsSource for GitHubProvider {
    async fn releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        Ok(self.client.list_releases(owner, repo).await?)
    }

    async fn stargazer_pages(&self, owner: &str, repo: &str) -> Result<Vec<Vec<StarredUser>>> {
        Ok(self.client.list_stargazer_pages(owner, repo).await?)
    }

    async fn stargazers_page(&self, owner: &str, repo: &str, page: u32) -> Result<Vec<StarredUser>> {
        Ok(self.client.get_stargazers_page(owner, repo, page).await?)
    }

    async fn stargazer_count(&self, owner: &str, repo: &str) -> Result<u64> {
        let repository = self.client.get_repository(owner, repo).await?;
        Ok(repository.stargazers_count)
    }

    async fn user(&self, login: &str) -> Result<User> {
        Ok(self.client.get_user(login).await?)
    }

    async fn org_repositories(&self, org: &str) -> Result<Vec<OrgRepository>> {
        Ok(self.client.list_org_repos(org).await?)
    }

    async fn contributors(&self, owner: &str, repo: &str) -> Result<Vec<Contributor>> {
        Ok(self.client.list_contributors(owner, repo).await?)
    }

    async fn org_members(&self, org: &str) -> Result<Vec<OrgMember>> {
        Ok(self.client.list_org_members(org).await?)
    }

    async fn commits_since(&self, owner: &str, repo: &str, since: DateTime<Utc>) -> Result<Vec<Commit>> {
        Ok(self.client.list_commits_since(owner, repo, since).await?)
    }
}
