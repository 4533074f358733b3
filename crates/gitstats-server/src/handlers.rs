use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use gitstats_core::{
    extract_repo_info, ActiveContributorsReport, DownloadStats, GitHubProvider, MultiRepoStarHistory,
    OrganizationStats, RepoRef, StargazerPage, StatsService,
};
use tracing::info;

use crate::error::ApiError;
use crate::extract::{bearer_token, QueryParams};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Service for one request, authenticated as the caller when they sent a token
fn service(state: &AppState, headers: &HeaderMap) -> StatsService<GitHubProvider> {
    let token = bearer_token(headers).or_else(|| state.client.token().map(str::to_string));
    let client = state.client.with_token(token);
    StatsService::new(GitHubProvider::new(client)).with_failure_mode(state.failure_mode)
}

pub async fn repo_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<DownloadStats> {
    let params = QueryParams::parse(query.as_deref());
    let url = params
        .first("repo")
        .ok_or_else(|| ApiError::bad_request("Repository URL is required"))?;
    let repo = extract_repo_info(url)?;

    info!(repo = %repo, "Computing download stats");
    let stats = service(&state, &headers).download_stats(&repo).await?;
    Ok(Json(stats))
}

pub async fn star_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<MultiRepoStarHistory> {
    let params = QueryParams::parse(query.as_deref());
    let urls = params.all("repo");
    if urls.is_empty() {
        return Err(ApiError::bad_request("At least one repository URL is required"));
    }

    // every URL is checked before the first upstream call
    let repos = urls
        .into_iter()
        .map(extract_repo_info)
        .collect::<gitstats_core::Result<Vec<RepoRef>>>()?;

    info!(repos = repos.len(), "Computing star history");
    let history = service(&state, &headers).star_history(&repos).await?;
    Ok(Json(history))
}

pub async fn org_contributors(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<OrganizationStats> {
    let params = QueryParams::parse(query.as_deref());
    let org = params
        .first("org")
        .ok_or_else(|| ApiError::bad_request("Organization name is required"))?;

    info!(org, "Counting organization contributors");
    let stats = service(&state, &headers).org_contributors(org).await?;
    Ok(Json(stats))
}

pub async fn active_contributors(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<ActiveContributorsReport> {
    let params = QueryParams::parse(query.as_deref());
    let stats = service(&state, &headers);
    let now = Utc::now();

    // repo wins when both are given
    let report = match (params.first("repo"), params.first("org")) {
        (Some(url), _) => {
            let repo = extract_repo_info(url)?;
            info!(repo = %repo, "Ranking active contributors");
            stats.active_contributors_for_repo(&repo, now).await?
        }
        (None, Some(org)) => {
            info!(org, "Ranking active contributors");
            stats.active_contributors_for_org(org, now).await?
        }
        (None, None) => {
            return Err(ApiError::bad_request(
                "Either organization name or repository URL is required",
            ))
        }
    };

    Ok(Json(report))
}

pub async fn github_stargazers(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<StargazerPage> {
    let params = QueryParams::parse(query.as_deref());
    let (Some(owner), Some(repo)) = (params.first("owner"), params.first("repo")) else {
        return Err(ApiError::bad_request("Both owner and repository name are required"));
    };
    let page = params.page();

    info!(owner, repo, page, "Listing stargazers");
    let stargazers = service(&state, &headers).stargazer_page(owner, repo, page).await?;
    Ok(Json(stargazers))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
