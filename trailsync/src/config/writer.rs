//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written to `config.ini`, and the
//! masked variant printed by `trailsync config show`.

use std::path::Path;

use super::settings::ConfigFile;

/// How credentials are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secrets {
    Reveal,
    Mask,
}

fn secret(value: Option<&str>, secrets: Secrets) -> String {
    match (value, secrets) {
        (None, _) => String::new(),
        (Some(v), Secrets::Reveal) => v.to_string(),
        (Some(v), Secrets::Mask) => mask(v),
    }
}

/// Keeps the last four characters of long secrets.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Convert a `ConfigFile` to a commented INI string.
pub(super) fn to_config_string(config: &ConfigFile, secrets: Secrets) -> String {
    let api_url = config.content.api_url.as_deref().unwrap_or("");
    let data_api_url = config.features.data_api_url.as_deref().unwrap_or("");
    let application_id = config.search.application_id.as_deref().unwrap_or("");

    format!(
        r#"[content]
; GraphQL content API endpoint (env: GRAPHCMS_API_URL)
api_url = {}
; Permanent auth token with mutation rights (env: GRAPHCMS_API_TOKEN)
api_token = {}

[render]
; Mapbox access token for the Static Images API (env: MAPBOX_ACCESS_TOKEN)
mapbox_access_token = {}
; Map style as owner/style_id
style = {}
; Image size in pixels (max 1280)
width = {}
height = {}
; Padding around the framed bounding box in pixels
padding = {}

[search]
; Algolia application (env: ALGOLIA_APPLICATION_ID)
application_id = {}
; Admin key with write access (env: ALGOLIA_ADMIN_API_KEY)
admin_api_key = {}
cache_index = {}
track_index = {}

[features]
; Atlas Data API base URL (env: FEATURE_STORE_API_URL)
data_api_url = {}
; Data API key (env: FEATURE_STORE_API_KEY)
api_key = {}
data_source = {}
database = {}
collection = {}

[http]
; Timeout in seconds for each outbound request
timeout = {}

[logging]
directory = {}
file = {}
"#,
        api_url,
        secret(config.content.api_token.as_deref(), secrets),
        secret(config.render.access_token.as_deref(), secrets),
        config.render.style,
        config.render.width,
        config.render.height,
        config.render.padding,
        application_id,
        secret(config.search.admin_api_key.as_deref(), secrets),
        config.search.cache_index,
        config.search.track_index,
        data_api_url,
        secret(config.features.api_key.as_deref(), secrets),
        config.features.data_source,
        config.features.database,
        config.features.collection,
        config.http.timeout,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
