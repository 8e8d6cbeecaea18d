//! Application configuration.
//!
//! # Responsibility
//! - Describe the backend (auth pool + API endpoint) the app will talk to
//!   once one exists, and the simulated latency of the mock data source.
//! - Load overrides from TOML text and from `TASKDECK_*` environment values.
//!
//! # Invariants
//! - Every field has a default; a missing file or variable never fails.
//! - Placeholder backend values mean "not configured"; nothing connects to
//!   the backend section yet.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const PLACEHOLDER_USER_POOL_ID: &str = "YOUR_USER_POOL_ID";
const PLACEHOLDER_USER_POOL_CLIENT_ID: &str = "YOUR_USER_POOL_CLIENT_ID";
const PLACEHOLDER_API_ENDPOINT: &str = "YOUR_API_GATEWAY_ENDPOINT";
const DEFAULT_REGION: &str = "us-east-1";

pub const ENV_USER_POOL_ID: &str = "TASKDECK_USER_POOL_ID";
pub const ENV_USER_POOL_CLIENT_ID: &str = "TASKDECK_USER_POOL_CLIENT_ID";
pub const ENV_REGION: &str = "TASKDECK_REGION";
pub const ENV_API_ENDPOINT: &str = "TASKDECK_API_ENDPOINT";
pub const ENV_LOG_LEVEL: &str = "TASKDECK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKDECK_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub latency: LatencyConfig,
    pub logging: LoggingConfig,
}

/// User pool settings for the future auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub user_pool_id: String,
    pub user_pool_client_id: String,
    pub region: String,
}

/// Task API settings for the future remote data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
}

/// Simulated round-trip delays used by the mock data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub fetch_ms: u64,
    pub mutate_ms: u64,
    pub sign_out_ms: u64,
}

/// Optional logging bootstrap settings.
///
/// Logging stays off unless `dir` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_pool_id: PLACEHOLDER_USER_POOL_ID.to_string(),
            user_pool_client_id: PLACEHOLDER_USER_POOL_CLIENT_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: PLACEHOLDER_API_ENDPOINT.to_string(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fetch_ms: 500,
            mutate_ms: 300,
            sign_out_ms: 500,
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn none() -> Self {
        Self {
            fetch_ms: 0,
            mutate_ms: 0,
            sign_out_ms: 0,
        }
    }

    pub fn fetch(&self) -> Duration {
        Duration::from_millis(self.fetch_ms)
    }

    pub fn mutate(&self) -> Duration {
        Duration::from_millis(self.mutate_ms)
    }

    pub fn sign_out(&self) -> Duration {
        Duration::from_millis(self.sign_out_ms)
    }
}

impl AppConfig {
    /// Parses TOML text; absent tables and keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults overridden by `TASKDECK_*` process environment values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(ENV_USER_POOL_ID) {
            self.auth.user_pool_id = value;
        }
        if let Some(value) = read(ENV_USER_POOL_CLIENT_ID) {
            self.auth.user_pool_client_id = value;
        }
        if let Some(value) = read(ENV_REGION) {
            self.auth.region = value;
        }
        if let Some(value) = read(ENV_API_ENDPOINT) {
            self.api.endpoint = value;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.logging.level = Some(value);
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.logging.dir = Some(value);
        }
    }

    /// Whether every backend value has been replaced with a real one.
    pub fn is_backend_configured(&self) -> bool {
        self.auth.user_pool_id != PLACEHOLDER_USER_POOL_ID
            && self.auth.user_pool_client_id != PLACEHOLDER_USER_POOL_CLIENT_ID
            && self.api.endpoint != PLACEHOLDER_API_ENDPOINT
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, LatencyConfig, ENV_API_ENDPOINT, ENV_REGION, ENV_USER_POOL_ID};
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn defaults_match_placeholder_stub() {
        let config = AppConfig::default();
        assert_eq!(config.auth.region, "us-east-1");
        assert_eq!(config.api.endpoint, "YOUR_API_GATEWAY_ENDPOINT");
        assert_eq!(config.latency.fetch(), Duration::from_millis(500));
        assert_eq!(config.latency.mutate(), Duration::from_millis(300));
        assert!(!config.is_backend_configured());
    }

    #[test]
    fn toml_overrides_only_listed_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            [auth]
            region = "eu-west-1"

            [latency]
            fetch_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.region, "eu-west-1");
        assert_eq!(config.auth.user_pool_id, "YOUR_USER_POOL_ID");
        assert_eq!(config.latency.fetch_ms, 10);
        assert_eq!(config.latency.mutate_ms, 300);
    }

    #[test]
    fn toml_with_wrong_types_is_rejected() {
        let err = AppConfig::from_toml_str("[latency]\nfetch_ms = \"slow\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_USER_POOL_ID, " pool-123 "),
            (ENV_REGION, "   "),
            (ENV_API_ENDPOINT, "https://api.example.test"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.auth.user_pool_id, "pool-123");
        assert_eq!(config.auth.region, "us-east-1");
        assert_eq!(config.api.endpoint, "https://api.example.test");
        assert!(!config.is_backend_configured());
    }

    #[test]
    fn latency_none_is_zero() {
        assert_eq!(LatencyConfig::none().sign_out(), Duration::ZERO);
    }
}
