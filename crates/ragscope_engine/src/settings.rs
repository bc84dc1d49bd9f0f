use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable naming the pipeline's base URL.
pub const API_URL_ENV: &str = "RAGSCOPE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid base url {value:?}: {message}")]
    InvalidBaseUrl { value: String, message: String },
    #[error("base url must use http or https, got {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: parse_base_url(DEFAULT_API_URL).expect("default api url"),
            connect_timeout: Duration::from_secs(10),
            // Generation runs several LLM calls server-side.
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Reads the base URL from `RAGSCOPE_API_URL`, falling back to the local
    /// default when it is unset or blank.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_value(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Settings for a raw base URL as it would appear in the environment.
    pub fn from_value(value: Option<&str>) -> Result<Self, SettingsError> {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() => Self::with_base_url(value),
            _ => Ok(Self::default()),
        }
    }
}

/// Parses a base URL and gives it a trailing slash so endpoint joins keep
/// any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, SettingsError> {
    let mut url = Url::parse(raw).map_err(|err| SettingsError::InvalidBaseUrl {
        value: raw.to_string(),
        message: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSettings {
    /// Gap between consecutive step reveals of one response.
    pub reveal_interval: Duration,
    /// Period of the graph simulator.
    pub simulation_tick: Duration,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            reveal_interval: Duration::from_millis(300),
            simulation_tick: Duration::from_millis(1500),
        }
    }
}
