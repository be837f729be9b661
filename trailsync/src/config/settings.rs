//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Content repository (GraphCMS) settings
    pub content: ContentSettings,
    /// Static map rendering (Mapbox) settings
    pub render: RenderSettings,
    /// Search and cache index (Algolia) settings
    pub search: SearchSettings,
    /// Feature store (Atlas Data API) settings
    pub features: FeatureStoreSettings,
    /// HTTP transport settings
    pub http: HttpSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Content repository configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSettings {
    /// GraphQL content API endpoint
    pub api_url: Option<String>,
    /// Permanent auth token sent as a bearer token
    pub api_token: Option<String>,
}

/// Rendering service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub access_token: Option<String>,
    /// Map style as `{owner}/{style_id}`
    pub style: String,
    pub width: u32,
    pub height: u32,
    /// Pixels of padding around the framed bounding box
    pub padding: u32,
}

/// Search index configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub application_id: Option<String>,
    /// Admin key; write access is required
    pub admin_api_key: Option<String>,
    /// Index holding per-category collection cache entries
    pub cache_index: String,
    /// Index holding one document per track
    pub track_index: String,
}

/// Feature store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStoreSettings {
    /// Data API base URL, up to and including the API version
    pub data_api_url: Option<String>,
    pub api_key: Option<String>,
    pub data_source: String,
    pub database: String,
    pub collection: String,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Timeout in seconds for each request.
    pub timeout: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
