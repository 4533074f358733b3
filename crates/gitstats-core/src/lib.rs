// Core business logic lives here - the brain of the operation
pub mod config;
pub mod contributors;
pub mod downloads;
pub mod error;
pub mod models;
pub mod providers;
pub mod repo_url;
pub mod service;
pub mod source;
pub mod star_history;
pub mod stargazers;

pub use config::Config;
pub use error::Error;
pub use models::*;
pub use providers::GitHubProvider;
pub use repo_url::{extract_repo_info, RepoRef};
pub use service::StatsService;
pub use source::{FailureMode, StatsSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
