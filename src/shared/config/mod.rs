//! Application configuration module
//!
//! Provides the validated configuration shared by every client entry point:
//! which sync mode to run in and where the backend lives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the Trip Store persists and synchronizes its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// No backend; everything lives in on-device storage
    #[default]
    LocalOnly,
    /// Synchronize with the REST backend
    Api,
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Backend base URL, required in [`SyncMode::Api`]
    pub server_url: Option<String>,
    /// Selected sync mode
    pub mode: SyncMode,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.mode, &self.server_url) {
            (SyncMode::Api, None) => Err(ConfigError::MissingValue("server_url")),
            (_, Some(url)) if !is_http_url(url) => Err(ConfigError::InvalidUrl(url.clone())),
            _ => Ok(()),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.is_empty())
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    mode: Option<SyncMode>,
}

impl AppConfigBuilder {
    /// Set the server URL. Trailing slashes are stripped.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.server_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Force a sync mode. Without this the mode is `Api` when a server URL
    /// is present and `LocalOnly` otherwise.
    pub fn mode(mut self, mode: SyncMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let mode = self.mode.unwrap_or(if self.server_url.is_some() {
            SyncMode::Api
        } else {
            SyncMode::LocalOnly
        });
        let config = AppConfig {
            server_url: self.server_url,
            mode,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
