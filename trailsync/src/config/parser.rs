//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module is the single place where INI key names are mapped to
//! struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [content] section
    if let Some(section) = ini.section(Some("content")) {
        set_optional(section, "api_url", &mut config.content.api_url);
        set_optional(section, "api_token", &mut config.content.api_token);
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        set_optional(section, "mapbox_access_token", &mut config.render.access_token);
        set_string(section, "style", &mut config.render.style);
        set_number(section, "render", "width", &mut config.render.width)?;
        set_number(section, "render", "height", &mut config.render.height)?;
        set_number(section, "render", "padding", &mut config.render.padding)?;
        for (key, value) in [("width", config.render.width), ("height", config.render.height)] {
            if value == 0 {
                return Err(ConfigFileError::InvalidValue {
                    section: "render".to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "must be at least 1 pixel".to_string(),
                });
            }
        }
    }

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        set_optional(section, "application_id", &mut config.search.application_id);
        set_optional(section, "admin_api_key", &mut config.search.admin_api_key);
        set_string(section, "cache_index", &mut config.search.cache_index);
        set_string(section, "track_index", &mut config.search.track_index);
    }

    // [features] section
    if let Some(section) = ini.section(Some("features")) {
        set_optional(section, "data_api_url", &mut config.features.data_api_url);
        set_optional(section, "api_key", &mut config.features.api_key);
        set_string(section, "data_source", &mut config.features.data_source);
        set_string(section, "database", &mut config.features.database);
        set_string(section, "collection", &mut config.features.collection);
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        set_number(section, "http", "timeout", &mut config.http.timeout)?;
        if config.http.timeout == 0 {
            return Err(ConfigFileError::InvalidValue {
                section: "http".to_string(),
                key: "timeout".to_string(),
                value: "0".to_string(),
                reason: "must be a positive integer (seconds)".to_string(),
            });
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        set_string(section, "file", &mut config.logging.file);
    }

    Ok(config)
}

/// Empty values leave the field unset.
fn set_optional(section: &Properties, key: &str, field: &mut Option<String>) {
    if let Some(v) = section.get(key) {
        let v = v.trim();
        if !v.is_empty() {
            *field = Some(v.to_string());
        }
    }
}

/// Empty values keep the default.
fn set_string(section: &Properties, key: &str, field: &mut String) {
    if let Some(v) = section.get(key) {
        let v = v.trim();
        if !v.is_empty() {
            *field = v.to_string();
        }
    }
}

fn set_number<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    field: &mut T,
) -> Result<(), ConfigFileError> {
    if let Some(v) = section.get(key) {
        *field = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: v.to_string(),
            reason: "must be a non-negative integer".to_string(),
        })?;
    }
    Ok(())
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
