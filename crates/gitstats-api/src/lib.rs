// GitHub REST plumbing: the client, the page walker and the wire types
pub mod github;
pub mod pagination;
pub mod types;

// Re-export common types
pub use github::{GitHubClient, GitHubError, ACCEPT_JSON, ACCEPT_STAR_JSON, GITHUB_API_BASE};
pub use pagination::{PageQuery, PER_PAGE};
pub use types::{
    Commit, CommitDetail, Contributor, GitSignature, OrgMember, OrgRepository, Release, ReleaseAsset,
    RepositoryInfo, SimpleUser, StarredUser, User,
};
