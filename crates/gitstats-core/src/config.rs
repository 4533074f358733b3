use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::source::FailureMode;

/// Main configuration structure
///
/// Sources, lowest priority first:
/// 1. Built-in defaults
/// 2. `<config_dir>/gitstats/config.toml`
/// 3. `./gitstats.toml`, or the file passed with `--config`
/// 4. `GITSTATS_*` env vars (`GITSTATS_SERVER__PORT` -> `server.port`)
/// 5. Plain `PORT` and `GITHUB_TOKEN`, for old deployments
///
/// CLI flags go on top of that, applied by the binary.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
///
/// [github]
/// token = "ghp_..."
/// api_url = "https://api.github.com"
/// timeout_secs = 30
///
/// [aggregation]
/// best_effort = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    /// Used when a request doesn't bring its own token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub api_url: String,
    /// Per-request timeout. No timeout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: gitstats_api::GITHUB_API_BASE.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregationConfig {
    /// Skip repositories/stargazers that fail instead of failing the request
    pub best_effort: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { best_effort: true }
    }
}

/// Unprefixed variables older deployments set
#[derive(Debug, Clone, Default)]
pub struct LegacyVars {
    pub port: Option<String>,
    pub github_token: Option<String>,
}

impl LegacyVars {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            github_token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load the layered configuration.
    ///
    /// `explicit` replaces `./gitstats.toml` and must exist.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        let mut files = Vec::new();

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                tracing::debug!("Loading config from {:?}", user_config);
                files.push((user_config, false));
            }
        }

        match explicit {
            Some(path) => {
                tracing::debug!("Loading config from {:?}", path);
                files.push((path.to_path_buf(), true));
            }
            None => {
                let local = PathBuf::from("gitstats.toml");
                if local.exists() {
                    tracing::debug!("Loading config from ./gitstats.toml");
                    files.push((local, false));
                }
            }
        }

        Self::from_sources(&files, Self::environment(), &LegacyVars::from_env())
    }

    /// `GITSTATS_` prefixed variables, `__` between section and key
    pub fn environment() -> Environment {
        Environment::with_prefix("GITSTATS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Build from explicit sources. `files` are `(path, required)`, lowest
    /// priority first.
    pub fn from_sources(
        files: &[(PathBuf, bool)],
        env: Environment,
        legacy: &LegacyVars,
    ) -> crate::Result<Self> {
        let mut builder = ConfigBuilder::builder();

        for (path, required) in files {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(*required),
            );
        }

        builder = builder
            .add_source(env)
            .set_override_option("server.port", non_empty(&legacy.port))?
            .set_override_option("github.token", non_empty(&legacy.github_token))?;

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// `<config_dir>/gitstats/config.toml`, XDG on Linux, AppData on Windows
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gitstats").join("config.toml"))
    }

    /// Token from config, empty counts as unset
    pub fn github_token(&self) -> Option<String> {
        non_empty(&self.github.token)
    }

    pub fn github_timeout(&self) -> Option<Duration> {
        self.github.timeout_secs.map(Duration::from_secs)
    }

    pub fn failure_mode(&self) -> FailureMode {
        FailureMode::from_best_effort(self.aggregation.best_effort)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Effective configuration as TOML, token masked
    pub fn to_toml(&self) -> crate::Result<String> {
        let mut printable = self.clone();
        if printable.github.token.is_some() {
            printable.github.token = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&printable)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
