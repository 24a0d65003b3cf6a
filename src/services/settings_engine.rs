// SmartBookmarks Settings Engine
// Loads and saves the client configuration as a JSON file in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::errors::ConfigError;
use crate::types::settings::{BackendConfig, ClientConfig};

/// Loads and persists [`ClientConfig`].
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: ClientConfig,
}

impl SettingsEngine {
    /// Creates a SettingsEngine.
    ///
    /// If `path_override` is `Some`, that file is used; otherwise
    /// `<config dir>/smartbookmarks/config.json`.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path = path_override.unwrap_or_else(Self::default_config_path);
        Self {
            config_path,
            settings: ClientConfig::default(),
        }
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smartbookmarks")
            .join("config.json")
    }

    /// Loads the config file.
    ///
    /// A missing file yields the defaults; a malformed or invalid one is an error.
    pub fn load(&mut self) -> Result<ClientConfig, ConfigError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ClientConfig::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;

        let settings: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Serialization(format!("Failed to parse config file: {}", e)))?;
        validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Writes the current config, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn settings(&self) -> &ClientConfig {
        &self.settings
    }

    /// Replaces the in-memory config after validating it. Call [`save`](Self::save) to persist.
    pub fn replace(&mut self, settings: ClientConfig) -> Result<(), ConfigError> {
        validate(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

fn validate(settings: &ClientConfig) -> Result<(), ConfigError> {
    if settings.realtime_channel.trim().is_empty() {
        return Err(ConfigError::InvalidValue("realtime_channel cannot be empty".to_string()));
    }
    match &settings.backend {
        BackendConfig::Sqlite { path } if path.trim().is_empty() => {
            Err(ConfigError::InvalidValue("sqlite path cannot be empty".to_string()))
        }
        BackendConfig::Rest { base_url, .. } if url::Url::parse(base_url).is_err() => {
            Err(ConfigError::InvalidValue(format!("invalid REST base url: {}", base_url)))
        }
        _ => Ok(()),
    }
}
