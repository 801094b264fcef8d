//! Client configuration: endpoint, credentials, OAuth scope and timeout.
//!
//! Credentials are supplied by the embedding application, either directly
//! through `ClientConfig::new` or from the process environment via
//! `ClientConfig::from_env`. Nothing is read from or written to disk.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::http::DEFAULT_TIMEOUT;

/// Base URL of the hosted NinjaOne API.
pub const DEFAULT_BASE_URL: &str = "https://api.ninjarmm.com";

/// OAuth scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = "monitoring";

pub const ENV_CLIENT_ID: &str = "NINJA_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "NINJA_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "NINJA_BASE_URL";
pub const ENV_SCOPE: &str = "NINJA_SCOPE";

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Whole-request timeout in milliseconds; 0 disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl ClientConfig {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            base_url: default_base_url(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: default_scope(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Reads `NINJA_CLIENT_ID` and `NINJA_CLIENT_SECRET` (required) plus
    /// `NINJA_BASE_URL` and `NINJA_SCOPE` (optional).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(&required(ENV_CLIENT_ID)?, &required(ENV_CLIENT_SECRET)?);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config = config.with_base_url(&base_url);
        }
        if let Some(scope) = lookup(ENV_SCOPE).filter(|v| !v.is_empty()) {
            config = config.with_scope(&scope);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// Sets the whole-request timeout. `Duration::ZERO` disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
