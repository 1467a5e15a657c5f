//! Client configuration.
//!
//! `ClientConfig` is the only place credentials and the selected publication
//! live before a client is built. It can be assembled in code or loaded from
//! `CURATED_*` environment variables.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Production API root. Paths such as `/publications` are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://api.curated.co/api/v3";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "CURATED_API_KEY";
pub const ENV_BASE_URL: &str = "CURATED_BASE_URL";
pub const ENV_PUBLICATION_ID: &str = "CURATED_PUBLICATION_ID";
pub const ENV_TIMEOUT_SECS: &str = "CURATED_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub publication_id: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            publication_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_publication_id(mut self, publication_id: impl Into<String>) -> Self {
        self.publication_id = Some(publication_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `CURATED_API_KEY`, `CURATED_BASE_URL`,
    /// `CURATED_PUBLICATION_ID` and `CURATED_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup` instead of the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        config.publication_id = lookup(ENV_PUBLICATION_ID).filter(|v| !v.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            if secs == 0 {
                return Err(ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be greater than zero")));
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
