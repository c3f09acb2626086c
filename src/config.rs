use std::env;
use std::error::Error;
use std::fmt::{self, Formatter};
use std::time::Duration;

use reqwest::Url;

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug)]
pub enum ConfigError {
    BaseUrl { value: String, reason: String },
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BaseUrl { value, reason } => write!(
                f,
                "configuration error: invalid BASE_URL: value={}, reason={}",
                value, reason
            ),
        }
    }
}

/// Process-wide run configuration, resolved once at startup and shared
/// read-only with every executor.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub base_url: Url,
    pub price_updates_url: Url,
    pub active_alerts_url: Url,
    pub default_duration: Duration,
}

impl RunConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::from_base_url(&raw)
    }

    /// Parse and validate a base URL, resolving both endpoint URLs up front
    /// so that a malformed value fails before any executor launches.
    pub fn from_base_url(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::BaseUrl {
            value: raw.to_owned(),
            reason,
        };

        let base_url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme: {}", other))),
        }

        let price_updates_url = base_url
            .join("/price-updates")
            .map_err(|err| invalid(err.to_string()))?;
        let active_alerts_url = base_url
            .join("/active-alerts")
            .map_err(|err| invalid(err.to_string()))?;

        Ok(Self {
            base_url,
            price_updates_url,
            active_alerts_url,
            default_duration: Duration::from_secs(30),
        })
    }
}
