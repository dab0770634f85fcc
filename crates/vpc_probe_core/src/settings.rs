use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_TARGET_URL: &str = "https://httpbin.org/json";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const TARGET_URL_ENV: &str = "PROBE_TARGET_URL";
pub const TIMEOUT_MS_ENV: &str = "PROBE_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("PROBE_TARGET_URL must be an http:// or https:// URL, got `{0}`")]
    InvalidTargetUrl(String),
    #[error("PROBE_TIMEOUT_MS must be a positive integer of milliseconds, got `{0}`")]
    InvalidTimeout(String),
}

/// Target and bounded wait of the single outbound probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub url: String,
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ProbeSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(url) = non_blank(lookup(TARGET_URL_ENV)) {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidTargetUrl(url));
            }
            settings.url = url;
        }

        if let Some(raw) = non_blank(lookup(TIMEOUT_MS_ENV)) {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            settings.timeout = Duration::from_millis(millis);
        }

        Ok(settings)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
