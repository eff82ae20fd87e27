use caltrax_core::{RestClient, DEFAULT_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// Project URL (e.g., "https://xyz.supabase.co")
    pub url: Option<String>,
    /// API key sent with every request
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Returns true if the remote is configured (has both url and api_key)
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    /// Builds a client, or `None` if the remote is not configured.
    pub fn client(&self) -> Option<RestClient> {
        match (&self.url, &self.api_key) {
            (Some(url), Some(key)) => Some(RestClient::new(url.clone(), key.clone())),
            _ => None,
        }
    }
}

/// Sync tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Days of food entries pulled on each sync, today included
    pub window_days: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local cache files
    pub data_dir: ConfigValue<PathBuf>,
    /// Owner id of the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ConfigValue<String>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Remote store configuration
    pub remote: RemoteConfig,
    /// Sync configuration
    pub sync: SyncSettings,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    user_id: Option<String>,
    remote: Option<RemoteConfig>,
    sync: Option<SyncSettings>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut user_id = None;
        let mut config_file = None;
        let mut remote = RemoteConfig::default();
        let mut sync = SyncSettings::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            debug!("Loaded config from {}", path.display());
            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(id) = file_config.user_id {
                user_id = Some(ConfigValue::new(id, ConfigSource::File));
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
            if let Some(sync_settings) = file_config.sync {
                sync = sync_settings;
            }
        }

        // Apply environment variable overrides
        if let Some(dir) = env("CALTRAX_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(id) = env("CALTRAX_USER_ID") {
            user_id = Some(ConfigValue::new(id, ConfigSource::Environment));
        }
        if let Some(url) = env("CALTRAX_REMOTE_URL") {
            remote.url = Some(url);
        }
        if let Some(key) = env("CALTRAX_REMOTE_API_KEY") {
            remote.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            user_id,
            config_file,
            remote,
            sync,
        })
    }

    /// The configured owner id, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_ref().map(|v| v.value.as_str())
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/caltrax/
    /// - macOS: ~/Library/Application Support/caltrax/
    /// - Windows: %APPDATA%/caltrax/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caltrax")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/caltrax/
    /// - macOS: ~/Library/Application Support/caltrax/
    /// - Windows: %APPDATA%/caltrax/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caltrax")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolves a relative path against the config file's directory.
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
