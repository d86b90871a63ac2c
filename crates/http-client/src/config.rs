//! Client configuration.

use std::time::Duration;

use pagerduty::{ApiError, RequestOptions};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default PagerDuty REST API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "PAGERDUTY_TOKEN";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "PAGERDUTY_BASE_URL";
/// Environment variable overriding [`ClientConfig::from`].
pub const FROM_ENV: &str = "PAGERDUTY_FROM";

/// Settings for [`crate::HttpClient`].
///
/// Deserializable from the `[pagerduty]` table of a TOML file; every field
/// except the token has a default.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL.
    pub base_url: String,

    /// REST API token (`Authorization: Token token=…`).
    pub api_token: String,

    /// Email address sent as the `From` header on writes. Required by
    /// PagerDuty when `api_token` is an account-level token.
    pub from: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Extra attempts for retryable failures. `0` disables retries.
    pub max_retries: u32,

    /// Back-off before the first retry, in milliseconds; doubles per attempt.
    pub initial_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            from: None,
            timeout_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("from", &self.from)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with the given token and defaults elsewhere.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Applies `PAGERDUTY_TOKEN`, `PAGERDUTY_BASE_URL`, and `PAGERDUTY_FROM`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by the environment variable names.
    /// Empty values are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if let Some(token) = lookup(TOKEN_ENV) {
            self.api_token = token;
        }
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(from) = lookup(FROM_ENV) {
            self.from = Some(from);
        }
        self
    }

    /// Checks the configuration and returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] if the token is empty or the base URL is
    /// not an absolute `http`/`https` URL.
    pub fn validate(&self) -> Result<Url, ApiError> {
        if self.api_token.trim().is_empty() {
            return Err(ApiError::Configuration {
                message: format!("API token is required (set {TOKEN_ENV})"),
            });
        }

        let url = Url::parse(&self.base_url).map_err(|err| ApiError::Configuration {
            message: format!("invalid base URL '{}': {err}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Configuration {
                message: format!("base URL '{}' must use http or https", self.base_url),
            });
        }
        Ok(url)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Back-off before the first retry.
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Options to attach to every write, carrying the `From` header when set.
    pub fn request_options(&self) -> RequestOptions {
        match self.from.as_deref().filter(|from| !from.is_empty()) {
            Some(from) => RequestOptions::new().with_from(from),
            None => RequestOptions::new(),
        }
    }
}
