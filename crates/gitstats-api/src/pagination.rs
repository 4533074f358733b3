//! Page-by-page walking of GitHub list endpoints.
//!
//! GitHub caps list responses at `per_page` items. We ask for the maximum (100)
//! and keep bumping `page` until a page comes back short or empty. No Link
//! header parsing, no retries: the first failed page fails the whole walk.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::{GitHubClient, Result, ACCEPT_JSON, ACCEPT_STAR_JSON};

/// Page size requested from every list endpoint
pub const PER_PAGE: u32 = 100;

/// Describes one paginated resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Route relative to the API base, e.g. `/repos/o/r/releases`
    pub route: String,
    /// Extra query parameters sent with every page
    pub params: Vec<(&'static str, String)>,
    /// Media type for the `Accept` header
    pub accept: &'static str,
    /// Treat `204 No Content` as an empty page instead of an error
    pub no_content_is_empty: bool,
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

impl PageQuery {
    fn new(route: String) -> Self {
        Self {
            route,
            params: Vec::new(),
            accept: ACCEPT_JSON,
            no_content_is_empty: false,
        }
    }

    pub fn releases(owner: &str, repo: &str) -> Self {
        Self::new(format!("/repos/{}/{}/releases", segment(owner), segment(repo)))
    }

    /// Stargazers with `starred_at` timestamps
    pub fn stargazers(owner: &str, repo: &str) -> Self {
        Self {
            accept: ACCEPT_STAR_JSON,
            ..Self::new(format!("/repos/{}/{}/stargazers", segment(owner), segment(repo)))
        }
    }

    /// Contributors listing - GitHub answers 204 for empty repositories
    pub fn contributors(owner: &str, repo: &str) -> Self {
        Self {
            no_content_is_empty: true,
            ..Self::new(format!("/repos/{}/{}/contributors", segment(owner), segment(repo)))
        }
    }

    pub fn commits_since(owner: &str, repo: &str, since: DateTime<Utc>) -> Self {
        Self {
            params: vec![("since", since.to_rfc3339_opts(SecondsFormat::Secs, true))],
            ..Self::new(format!("/repos/{}/{}/commits", segment(owner), segment(repo)))
        }
    }

    /// Public repositories of an organization
    pub fn org_repos(org: &str) -> Self {
        Self {
            params: vec![("type", "public".to_string())],
            ..Self::new(format!("/orgs/{}/repos", segment(org)))
        }
    }

    pub fn org_members(org: &str) -> Self {
        Self::new(format!("/orgs/{}/members", segment(org)))
    }
}

impl GitHubClient {
    /// Fetch every page of a resource, keeping page boundaries intact.
    ///
    /// Empty pages are never included, so `pages[i]` is upstream page `i + 1`.
    pub async fn fetch_pages<T: DeserializeOwned>(&self, query: &PageQuery) -> Result<Vec<Vec<T>>> {
        let mut pages = Vec::new();
        let mut page = 1u32;

        loop {
            let items: Vec<T> = self.get_page(query, page).await?;
            let count = items.len();
            debug!(route = %query.route, page, count, "Fetched page");

            if count == 0 {
                break;
            }

            pages.push(items);

            if count < PER_PAGE as usize {
                break;
            }

            page += 1;
        }

        Ok(pages)
    }

    /// Fetch every page of a resource and concatenate them in arrival order
    pub async fn fetch_all<T: DeserializeOwned>(&self, query: &PageQuery) -> Result<Vec<T>> {
        let pages = self.fetch_pages(query).await?;
        Ok(pages.into_iter().flatten().collect())
    }
}
