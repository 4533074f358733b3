use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published release with its downloadable assets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Single asset attached to a release
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub download_count: u64,
}

/// The trimmed-down user object GitHub embeds in listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

/// Stargazer entry - only returned with the `star+json` media type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarredUser {
    pub starred_at: DateTime<Utc>,
    pub user: SimpleUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contributor {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub contributions: u64,
}

/// Repository entry in an organization listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrgRepository {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrgMember {
    pub login: String,
}

/// Commit listing entry
///
/// `author` is the linked GitHub account and is null when the commit email
/// doesn't map to any user. `commit.author` is the raw git signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub author: Option<SimpleUser>,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitDetail {
    pub author: Option<GitSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitSignature {
    pub date: Option<DateTime<Utc>>,
}

/// The slice of `/repos/{owner}/{repo}` we care about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Full user profile from `/users/{login}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_without_linked_author() {
        let json = r#"{
            "sha": "abc123",
            "author": null,
            "commit": {"author": {"name": "Ghost", "email": "g@example.com", "date": "2024-05-01T10:00:00Z"}}
        }"#;

        let commit: Commit = serde_json::from_str(json).unwrap();
        assert!(commit.author.is_none());
        let date = commit.commit.author.and_then(|a| a.date).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_release_without_assets() {
        let json = r#"{"id": 7, "tag_name": "v0.1.0", "created_at": "2023-01-02T03:04:05Z"}"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v0.1.0");
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_user_with_missing_profile_fields() {
        let json = r#"{"login": "octocat", "name": null, "avatar_url": "https://a/1", "html_url": "https://github.com/octocat"}"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert!(user.name.is_none());
        assert!(user.location.is_none());
    }
}
