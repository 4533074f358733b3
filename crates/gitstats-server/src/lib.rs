// HTTP surface: routes, shared state and the glue between axum and the core
pub mod error;
pub mod extract;
pub mod handlers;

use axum::handler::Handler;
use axum::routing::{get, MethodRouter};
use axum::Router;
use gitstats_api::{GitHubClient, GitHubError};
use gitstats_core::{Config, FailureMode};

pub use error::ApiError;

/// Shared by every request; nothing in here changes after startup
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pooled client carrying the configured default token
    pub client: GitHubClient,
    pub failure_mode: FailureMode,
}

impl AppState {
    pub fn new(client: GitHubClient, failure_mode: FailureMode) -> Self {
        Self { client, failure_mode }
    }

    pub fn from_config(config: &Config) -> Result<Self, GitHubError> {
        let client = GitHubClient::with_base_url(config.github_token(), config.github.api_url.clone())?
            .with_timeout(config.github_timeout());
        Ok(Self::new(client, config.failure_mode()))
    }
}

/// GET and nothing else. HEAD included: axum would otherwise run the GET
/// handler for it, upstream calls and all.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler)
        .head(handlers::method_not_allowed)
        .fallback(handlers::method_not_allowed)
}

/// Every endpoint answers GET only; anything else gets a 405
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/repo-stats", get_only(handlers::repo_stats))
        .route("/star-history", get_only(handlers::star_history))
        .route("/org-contributors", get_only(handlers::org_contributors))
        .route("/active-contributors", get_only(handlers::active_contributors))
        .route("/github-stargazers", get_only(handlers::github_stargazers))
        .route("/health", get_only(handlers::health))
        .with_state(state)
}
