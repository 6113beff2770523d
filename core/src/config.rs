//! Client configuration.
//!
//! Values are resolved once at startup: built-in defaults, then `HUBVIEW_*`
//! environment variables (read through the `config` crate), then whatever the
//! binary applies on top (CLI flags). The resulting `ClientConfig` is
//! read-only afterwards.

use std::time::Duration;

use ::config::{Config as ConfigBuilder, Environment, Map};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_PREFIX: &str = "HUBVIEW";
pub const ENV_BASE_URL: &str = "HUBVIEW_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HUBVIEW_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "HUBVIEW_USER_AGENT";
pub const ENV_GITHUB_TOKEN: &str = "HUBVIEW_GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("{var} must be a positive number of seconds, got {value}")]
    InvalidTimeout { var: &'static str, value: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    /// Applied separately to connecting and to reading the response.
    pub timeout: Duration,
    pub user_agent: String,
    pub token: Option<String>,
}

/// `HUBVIEW_*` variables, keyed by what follows the prefix.
#[derive(Debug, Default, Deserialize)]
struct EnvOverlay {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    github_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("hubview/", env!("CARGO_PKG_VERSION")).to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Like `from_env`, reading the given variables instead of the process
    /// environment.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Map<String, String> = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let overlay: EnvOverlay = ConfigBuilder::builder()
            .add_source(env.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        let mut config = Self::default();
        if let Some(url) = overlay.base_url.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(secs) = overlay.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout {
                    var: ENV_TIMEOUT_SECS,
                    value: secs,
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = overlay.user_agent {
            config.user_agent = agent;
        }
        config.token = overlay.github_token;
        tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_vars(no_vars()).unwrap();
        assert_eq!(config.base_url, "https://api.github.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("hubview/"));
        assert!(config.token.is_none());
    }

    #[test]
    fn env_overrides_defaults() {
        let config = ClientConfig::from_vars([
            (ENV_BASE_URL, "http://localhost:3000/"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_USER_AGENT, "hubview-test/1.0"),
            (ENV_GITHUB_TOKEN, "ghp_test"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "hubview-test/1.0");
        assert_eq!(config.token.as_deref(), Some("ghp_test"));
    }

    #[test]
    fn unrelated_vars_are_ignored() {
        let config = ClientConfig::from_vars([("GITHUB_TOKEN", "nope"), ("HOME", "/root")]).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_vars([(ENV_TIMEOUT_SECS, "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)), "got {err:?}");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_vars([(ENV_TIMEOUT_SECS, "0")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidTimeout { var: ENV_TIMEOUT_SECS, value: 0 }),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_token_is_ignored() {
        let config = ClientConfig::from_vars([(ENV_GITHUB_TOKEN, "")]).unwrap();
        assert!(config.token.is_none());
    }
}
