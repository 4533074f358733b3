use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Tried in order; the first one that matches wins.
///
/// The first handles `https://github.com/o/r`, `.git` suffixes and the
/// `git@github.com:o/r` form. The second picks up a trailing slash.
static PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"github\.com[:/]([^/]+)/([^/\.]+)(?:\.git)?$").expect("valid repo URL pattern"),
        Regex::new(r"github\.com/([^/]+)/([^/\.]+)/?$").expect("valid repo URL pattern"),
    ]
});

/// An `owner/name` pair pulled out of a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract owner and repository name from a GitHub URL.
///
/// No trimming or case folding happens here - what you pass is what we match.
pub fn extract_repo_info(url: &str) -> Result<RepoRef> {
    PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| RepoRef::new(&caps[1], &caps[2]))
        .ok_or(Error::InvalidUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_url() {
        let repo = extract_repo_info("https://github.com/owner/repo").unwrap();
        assert_eq!(repo, RepoRef::new("owner", "repo"));
        assert_eq!(repo.to_string(), "owner/repo");
    }

    #[test]
    fn test_extract_git_suffix() {
        let repo = extract_repo_info("https://github.com/owner/repo.git").unwrap();
        assert_eq!(repo, RepoRef::new("owner", "repo"));
    }

    #[test]
    fn test_extract_trailing_slash() {
        let repo = extract_repo_info("https://github.com/keploy/gitstats/").unwrap();
        assert_eq!(repo, RepoRef::new("keploy", "gitstats"));
    }

    #[test]
    fn test_extract_ssh_form() {
        let repo = extract_repo_info("git@github.com:rust-lang/cargo.git").unwrap();
        assert_eq!(repo, RepoRef::new("rust-lang", "cargo"));
    }

    #[test]
    fn test_invalid_urls() {
        for url in ["not-a-url", "https://invalid-url.com", "https://github.com/only-owner", ""] {
            assert!(
                matches!(extract_repo_info(url), Err(Error::InvalidUrl)),
                "expected {:?} to be rejected",
                url
            );
        }
    }

    #[test]
    fn test_case_is_untouched() {
        let repo = extract_repo_info("https://github.com/Owner/Repo").unwrap();
        assert_eq!(repo, RepoRef::new("Owner", "Repo"));
    }
}
