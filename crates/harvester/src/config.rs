use std::env;
use std::time::Duration;

use crate::error::HarvesterError;

/// Environment variable holding the actor provider API token.
pub const TOKEN_ENV: &str = "APIFY_TOKEN";
/// Optional override for the actor provider base URL.
pub const BASE_URL_ENV: &str = "APIFY_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Configuration for the actor job runner.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// Base URL of the actor provider API.
    pub base_url: String,
    /// Provider API token, sent as a query parameter on every call.
    pub token: String,
    /// Fixed interval between run-status polls.
    pub poll_interval: Duration,
    /// Wall-clock budget for a single actor run, submission to terminal state.
    pub run_timeout: Duration,
}

impl ActorConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            poll_interval: Duration::from_secs(2),
            run_timeout: Duration::from_secs(120),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// A missing or empty token is a hard configuration error, raised here
    /// before any network call is attempted.
    pub fn from_env() -> Result<Self, HarvesterError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HarvesterError> {
        let token = lookup(TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or(HarvesterError::MissingCredential { var: TOKEN_ENV })?;

        let mut config = Self::new(token);
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_run_timeout(mut self, run_timeout: Duration) -> Self {
        self.run_timeout = run_timeout;
        self
    }
}
