// Provider implementations backing StatsSource
pub mod github;

pub use github::GitHubProvider;
