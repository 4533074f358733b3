use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::pagination::{PageQuery, PER_PAGE};
use crate::types::{Commit, Contributor, OrgMember, OrgRepository, Release, RepositoryInfo, StarredUser, User};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default media type for REST v3 responses
pub const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Same as [`ACCEPT_JSON`] but stargazer listings include `starred_at`
pub const ACCEPT_STAR_JSON: &str = "application/vnd.github.v3.star+json";

const USER_AGENT_VALUE: &str = concat!("gitstats/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "rate limit exceeded. Please use a GitHub token. Limit: {}, Remaining: {}",
        .limit.as_deref().unwrap_or("unknown"),
        .remaining.as_deref().unwrap_or("unknown")
    )]
    RateLimited {
        limit: Option<String>,
        remaining: Option<String>,
    },

    #[error("GitHub API returned status: {status}, body: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl GitHubError {
    /// HTTP status reported by GitHub, if this error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::RateLimited { .. } => Some(StatusCode::FORBIDDEN.as_u16()),
            GitHubError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Thin GitHub REST client
///
/// Cloning is cheap: the underlying connection pool is shared, so handing a
/// per-request token to [`GitHubClient::with_token`] costs nothing.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a mock server in tests
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    /// Per-request timeout; without one we rely on reqwest's defaults
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Same client and connection pool, different credentials
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            ..self.clone()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, route: &str, accept: &'static str) -> Result<reqwest::RequestBuilder> {
        let url = format!("{}{}", self.base_url, route);
        let mut request = self.client.get(url).header(ACCEPT, accept);

        if let Some(ref token) = self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GitHubError::InvalidHeader(e.to_string()))?;
            request = request.header(AUTHORIZATION, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    /// Turn anything other than 200 into an error, keeping the body around
    async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            let header = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            return Err(GitHubError::RateLimited {
                limit: header("x-ratelimit-limit"),
                remaining: header("x-ratelimit-remaining"),
            });
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::ensure_ok(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET a single JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let response = self.request(route, ACCEPT_JSON)?.send().await?;
        Self::decode(response).await
    }

    /// GET one page of a paginated resource
    pub async fn get_page<T: DeserializeOwned>(&self, query: &PageQuery, page: u32) -> Result<Vec<T>> {
        let response = self
            .request(&query.route, query.accept)?
            .query(&query.params)
            .query(&[("page", page), ("per_page", PER_PAGE)])
            .send()
            .await?;

        if query.no_content_is_empty && response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        Self::decode(response).await
    }

    pub async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        self.fetch_all(&PageQuery::releases(owner, repo)).await
    }

    /// All stargazers, grouped by upstream page
    pub async fn list_stargazer_pages(&self, owner: &str, repo: &str) -> Result<Vec<Vec<StarredUser>>> {
        self.fetch_pages(&PageQuery::stargazers(owner, repo)).await
    }

    /// Single stargazer page, 1-based, oldest stargazers first
    pub async fn get_stargazers_page(&self, owner: &str, repo: &str, page: u32) -> Result<Vec<StarredUser>> {
        self.get_page(&PageQuery::stargazers(owner, repo), page).await
    }

    pub async fn list_contributors(&self, owner: &str, repo: &str) -> Result<Vec<Contributor>> {
        self.fetch_all(&PageQuery::contributors(owner, repo)).await
    }

    pub async fn list_commits_since(&self, owner: &str, repo: &str, since: DateTime<Utc>) -> Result<Vec<Commit>> {
        self.fetch_all(&PageQuery::commits_since(owner, repo, since)).await
    }

    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<OrgRepository>> {
        self.fetch_all(&PageQuery::org_repos(org)).await
    }

    pub async fn list_org_members(&self, org: &str) -> Result<Vec<OrgMember>> {
        self.fetch_all(&PageQuery::org_members(org)).await
    }

    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryInfo> {
        let route = format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        self.get_json(&route).await
    }

    pub async fn get_user(&self, login: &str) -> Result<User> {
        let route = format!("/users/{}", urlencoding::encode(login));
        self.get_json(&route).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn releases(start: u64, count: u64) -> serde_json::Value {
        let items: Vec<_> = (start..start + count)
            .map(|id| {
                json!({
                    "id": id,
                    "tag_name": format!("v{}", id),
                    "created_at": "2024-01-01T00:00:00Z",
                    "assets": []
                })
            })
            .collect();
        json!(items)
    }

    async fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
        GitHubClient::with_base_url(token.map(String::from), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_pagination_stops_on_short_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(releases(0, 100)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(releases(100, 3)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let all = client.list_releases("o", "r").await.unwrap();

        assert_eq!(all.len(), 103);
        assert_eq!(all[0].id, 0);
        assert_eq!(all[102].id, 102);
    }

    #[tokio::test]
    async fn test_pagination_stops_on_empty_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/acme/members"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let members = client.list_org_members("acme").await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_full_last_page_triggers_one_more_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/stargazers"))
            .and(query_param("page", "1"))
            .and(header("accept", ACCEPT_STAR_JSON))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                (0..100)
                    .map(|i| json!({
                        "starred_at": "2024-01-01T00:00:00Z",
                        "user": {"login": format!("u{}", i)}
                    }))
                    .collect::<Vec<_>>()
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/stargazers"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let pages = client.list_stargazer_pages("o", "r").await.unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 100);
    }

    #[tokio::test]
    async fn test_forbidden_is_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("X-RateLimit-Limit", "60")
                    .insert_header("X-RateLimit-Remaining", "0"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let err = client.list_releases("o", "r").await.unwrap_err();

        match &err {
            GitHubError::RateLimited { limit, remaining } => {
                assert_eq!(limit.as_deref(), Some("60"));
                assert_eq!(remaining.as_deref(), Some("0"));
            }
            other => panic!("expected rate limit error, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "rate limit exceeded. Please use a GitHub token. Limit: 60, Remaining: 0"
        );
    }

    #[tokio::test]
    async fn test_non_ok_status_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/missing/releases"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"message\":\"Not Found\"}"))
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let err = client.list_releases("o", "missing").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "GitHub API returned status: 404, body: {\"message\":\"Not Found\"}"
        );
    }

    #[tokio::test]
    async fn test_failed_second_page_aborts_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(releases(0, 100)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let err = client.list_releases("o", "r").await.unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_contributors_no_content_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/empty/contributors"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let contributors = client.list_contributors("o", "empty").await.unwrap();
        assert!(contributors.is_empty());
    }

    #[tokio::test]
    async fn test_no_content_is_an_error_elsewhere() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/releases"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server, None).await;
        let err = client.list_releases("o", "r").await.unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    #[tokio::test]
    async fn test_bearer_token_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat",
                "name": "The Octocat",
                "avatar_url": "https://avatars/1",
                "html_url": "https://github.com/octocat",
                "location": "San Francisco"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None).await.with_token(Some("s3cret".into()));
        let user = client.get_user("octocat").await.unwrap();

        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert_eq!(user.location.as_deref(), Some("San Francisco"));
    }

    #[tokio::test]
    async fn test_commits_since_sends_since_parameter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/commits"))
            .and(query_param("since", "2024-06-01T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "author": {"login": "alice"},
                    "commit": {"author": {"name": "Alice", "date": "2024-06-02T08:00:00Z"}}
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let since = "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let client = client_for(&server, None).await;
        let commits = client.list_commits_since("o", "r", since).await.unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].author.as_ref().unwrap().login, "alice");
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let client = GitHubClient::new(Some(String::new())).unwrap();
        assert!(client.token().is_none());
        assert_eq!(client.base_url(), GITHUB_API_BASE);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GitHubClient::with_base_url(None, "http://localhost:9000/".into()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
