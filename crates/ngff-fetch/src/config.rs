//! HTTP fetcher configuration.
//!
//! Defaults suit public object stores. Override via environment variables
//! or explicit construction.

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("ngff-validator/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`HttpFetcher`](crate::HttpFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `NGFF_TIMEOUT_SECS` (default: 30, must be > 0)
    /// - `NGFF_USER_AGENT` (default: `ngff-validator/<version>`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(secs) = env_parse::<u64>("NGFF_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "NGFF_TIMEOUT_SECS".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.timeout_secs = secs;
        }
        if let Ok(agent) = std::env::var("NGFF_USER_AGENT") {
            config.user_agent = agent;
        }
        Ok(config)
    }
}

/// Read and parse an environment variable. Unset is `Ok(None)`; set but
/// unparseable is an error.
pub fn env_parse<T>(var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                reason: format!("'{raw}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },
}
