use gitstats_api::GitHubError;
use thiserror::Error;

/// All the ways a stats request can go wrong
///
/// The first two are the caller's fault and end up as 400s; everything else
/// is ours (or GitHub's) and ends up as a 500.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid GitHub repository URL")]
    InvalidUrl,

    #[error("{0}")]
    Validation(String),

    /// Upstream failure, message passed through untouched
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the request itself was bad (as opposed to the upstream)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidUrl | Error::Validation(_))
    }

    /// HTTP status GitHub answered with, when this is an upstream error
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::GitHub(e) => e.status(),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::ConfigError(e.to_string())
    }
}
