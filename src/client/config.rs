use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, SyncMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Backend base URL; its presence selects API mode
pub const ENV_API_URL: &str = "TRIPMATE_API_URL";
/// Set to "1" to stay local-only even when an API URL is configured
pub const ENV_LOCAL_ONLY: &str = "TRIPMATE_LOCAL_ONLY";
/// Overrides the SQLite file used for local storage
pub const ENV_DB_PATH: &str = "TRIPMATE_DB_PATH";

/// On-disk configuration, `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
struct FileConfig {
    server_url: Option<String>,
    mode: Option<SyncMode>,
    db_path: Option<PathBuf>,
}

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
    db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        match Self::from_sources(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid configuration ({}), falling back to local-only mode", e);
                Self::from_app(AppConfig::default())
            }
        }
    }
}

impl Config {
    /// Create a new configuration from the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `config.toml` from the platform config directory, then apply
    /// environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_file_path();
        let file = path.as_deref().filter(|p| p.exists());
        Self::from_sources(file)
    }

    /// Build from an optional TOML file plus environment overrides
    pub fn from_sources(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_config = match file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str::<FileConfig>(&raw)?
            }
            None => FileConfig::default(),
        };

        let server_url = std::env::var(ENV_API_URL)
            .ok()
            .filter(|url| !url.is_empty())
            .or(file_config.server_url);
        let local_only = std::env::var(ENV_LOCAL_ONLY).unwrap_or_default() == "1";
        let db_path = std::env::var(ENV_DB_PATH)
            .ok()
            .map(PathBuf::from)
            .or(file_config.db_path);

        let mut builder = AppConfig::builder();
        if let Some(url) = server_url {
            builder = builder.server_url(url);
        }
        if local_only {
            builder = builder.mode(SyncMode::LocalOnly);
        } else if let Some(mode) = file_config.mode {
            builder = builder.mode(mode);
        }

        let mut config = Self::with_builder(builder)?;
        config.db_path = db_path;
        Ok(config)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self::from_app(builder.build()?))
    }

    fn from_app(app: AppConfig) -> Self {
        Self {
            app,
            token: None,
            db_path: None,
        }
    }

    /// `<config dir>/tripmate/config.toml`
    pub fn default_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripmate").join("config.toml"))
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Clear the token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url().unwrap_or_default(), path)
    }

    pub fn server_url(&self) -> Option<&str> {
        self.app.server_url.as_deref()
    }

    pub fn mode(&self) -> SyncMode {
        self.app.mode
    }

    /// Whether a backend is configured and selected
    pub fn is_api_backed(&self) -> bool {
        self.app.mode == SyncMode::Api
    }

    /// Explicit SQLite path, if one was configured
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_LOCAL_ONLY);
        std::env::remove_var(ENV_DB_PATH);
    }

    #[test]
    #[serial]
    fn test_config_without_env_is_local_only() {
        clear_env();
        let config = Config::new();
        assert_eq!(config.mode(), SyncMode::LocalOnly);
        assert!(config.server_url().is_none());
        assert!(config.get_token().is_none());
    }

    #[test]
    #[serial]
    fn test_env_url_selects_api_mode() {
        clear_env();
        std::env::set_var(ENV_API_URL, "http://127.0.0.1:3000/");
        let config = Config::new();
        assert!(config.is_api_backed());
        assert_eq!(config.api_url("/api/state"), "http://127.0.0.1:3000/api/state");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_local_only_toggle_wins() {
        clear_env();
        std::env::set_var(ENV_API_URL, "http://127.0.0.1:3000");
        std::env::set_var(ENV_LOCAL_ONLY, "1");
        let config = Config::new();
        assert_eq!(config.mode(), SyncMode::LocalOnly);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_file_config_with_env_override() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"https://file.example.com\"").unwrap();
        writeln!(file, "db_path = \"/tmp/tripmate-test.db\"").unwrap();

        let config = Config::from_sources(Some(file.path())).unwrap();
        assert_eq!(config.server_url(), Some("https://file.example.com"));
        assert_eq!(config.db_path(), Some(Path::new("/tmp/tripmate-test.db")));

        std::env::set_var(ENV_API_URL, "https://env.example.com");
        let config = Config::from_sources(Some(file.path())).unwrap();
        assert_eq!(config.server_url(), Some("https://env.example.com"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_set_and_clear_token() {
        clear_env();
        let mut config = Config::new();
        config.set_token(Some("test_token".to_string()));
        assert_eq!(config.get_token(), Some(&"test_token".to_string()));
        config.clear_token();
        assert!(config.get_token().is_none());
    }
}
