//! Default values and constants for all configuration settings.

use super::settings::*;
use crate::client::{
    DEFAULT_CACHE_INDEX, DEFAULT_COLLECTION, DEFAULT_DATA_SOURCE, DEFAULT_HEIGHT, DEFAULT_PADDING,
    DEFAULT_STYLE, DEFAULT_TIMEOUT_SECS, DEFAULT_TRACK_INDEX, DEFAULT_WIDTH,
};
use crate::logging::{default_log_dir, default_log_file};

/// Default feature store database name.
pub const DEFAULT_DATABASE: &str = "trailsync";

// Environment variables read by the deployed functions.
pub const ENV_CONTENT_API_URL: &str = "GRAPHCMS_API_URL";
pub const ENV_CONTENT_API_TOKEN: &str = "GRAPHCMS_API_TOKEN";
pub const ENV_MAPBOX_ACCESS_TOKEN: &str = "MAPBOX_ACCESS_TOKEN";
pub const ENV_SEARCH_APPLICATION_ID: &str = "ALGOLIA_APPLICATION_ID";
pub const ENV_SEARCH_ADMIN_API_KEY: &str = "ALGOLIA_ADMIN_API_KEY";
pub const ENV_FEATURE_STORE_API_URL: &str = "FEATURE_STORE_API_URL";
pub const ENV_FEATURE_STORE_API_KEY: &str = "FEATURE_STORE_API_KEY";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            content: ContentSettings {
                api_url: None,
                api_token: None,
            },
            render: RenderSettings {
                access_token: None,
                style: DEFAULT_STYLE.to_string(),
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                padding: DEFAULT_PADDING,
            },
            search: SearchSettings {
                application_id: None,
                admin_api_key: None,
                cache_index: DEFAULT_CACHE_INDEX.to_string(),
                track_index: DEFAULT_TRACK_INDEX.to_string(),
            },
            features: FeatureStoreSettings {
                data_api_url: None,
                api_key: None,
                data_source: DEFAULT_DATA_SOURCE.to_string(),
                database: DEFAULT_DATABASE.to_string(),
                collection: DEFAULT_COLLECTION.to_string(),
            },
            http: HttpSettings {
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                directory: default_log_dir().into(),
                file: default_log_file().to_string(),
            },
        }
    }
}
