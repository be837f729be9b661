//! Configuration loading for trailsync.
//!
//! The INI file supplies defaults for every collaborator; environment
//! variables override endpoints and credentials.
//!
//! # Example
//!
//! ```ignore
//! use trailsync::config::ConfigFile;
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env(|name| std::env::var(name).ok());
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use defaults::{
    DEFAULT_DATABASE, ENV_CONTENT_API_TOKEN, ENV_CONTENT_API_URL, ENV_FEATURE_STORE_API_KEY,
    ENV_FEATURE_STORE_API_URL, ENV_MAPBOX_ACCESS_TOKEN, ENV_SEARCH_ADMIN_API_KEY,
    ENV_SEARCH_APPLICATION_ID,
};
pub use settings::{
    ConfigFile, ContentSettings, FeatureStoreSettings, HttpSettings, LoggingSettings,
    RenderSettings, SearchSettings,
};
