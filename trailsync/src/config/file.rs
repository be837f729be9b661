//! Configuration file handling for ~/.trailsync/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;
use super::writer::{to_config_string, Secrets};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.trailsync/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = to_config_string(self, Secrets::Reveal);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Overlays credentials and endpoints from environment variables.
    ///
    /// `lookup` is usually `|name| std::env::var(name).ok()`. Empty values
    /// are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut Option<String>); 7] = [
            (ENV_CONTENT_API_URL, &mut self.content.api_url),
            (ENV_CONTENT_API_TOKEN, &mut self.content.api_token),
            (ENV_MAPBOX_ACCESS_TOKEN, &mut self.render.access_token),
            (ENV_SEARCH_APPLICATION_ID, &mut self.search.application_id),
            (ENV_SEARCH_ADMIN_API_KEY, &mut self.search.admin_api_key),
            (ENV_FEATURE_STORE_API_URL, &mut self.features.data_api_url),
            (ENV_FEATURE_STORE_API_KEY, &mut self.features.api_key),
        ];
        for (name, field) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *field = Some(value.trim().to_string());
            }
        }
    }

    /// The effective configuration as INI text with credentials masked.
    pub fn masked_summary(&self) -> String {
        to_config_string(self, Secrets::Mask)
    }
}

/// Get the path to the config directory (~/.trailsync).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trailsync")
}

/// Get the path to the config file (~/.trailsync/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config.content.api_url.is_none());
        assert_eq!(config.search.cache_index, "cache");
        assert_eq!(config.search.track_index, "tracks");
        assert_eq!(config.features.collection, "features");
        assert_eq!(config.http.timeout, crate::client::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_apply_env_overrides_file_values() {
        let mut config = ConfigFile::default();
        config.content.api_token = Some("from-file".to_string());
        let env: HashMap<&str, &str> = [
            ("GRAPHCMS_API_TOKEN", "from-env"),
            ("ALGOLIA_APPLICATION_ID", "APP"),
            ("MAPBOX_ACCESS_TOKEN", "  "),
        ]
        .into_iter()
        .collect();

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.content.api_token.as_deref(), Some("from-env"));
        assert_eq!(config.search.application_id.as_deref(), Some("APP"));
        assert!(config.render.access_token.is_none());
    }

    #[test]
    fn test_config_paths() {
        assert!(config_file_path().ends_with(".trailsync/config.ini"));
    }
}
