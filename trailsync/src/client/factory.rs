//! Client construction from configuration.
//!
//! All HTTP-backed clients share one [`AsyncReqwestClient`] and therefore
//! one connection pool.

use super::algolia::AlgoliaClient;
use super::atlas::AtlasFeatureStore;
use super::graphcms::GraphCmsClient;
use super::http::AsyncReqwestClient;
use super::mapbox::MapboxRenderer;
use super::types::ClientError;
use crate::config::{
    ConfigFile, ENV_CONTENT_API_TOKEN, ENV_CONTENT_API_URL, ENV_FEATURE_STORE_API_KEY,
    ENV_FEATURE_STORE_API_URL, ENV_MAPBOX_ACCESS_TOKEN, ENV_SEARCH_ADMIN_API_KEY,
    ENV_SEARCH_APPLICATION_ID,
};

/// Every collaborator client the pipeline needs.
pub struct ServiceClients {
    pub content: GraphCmsClient<AsyncReqwestClient>,
    pub renderer: MapboxRenderer,
    pub features: AtlasFeatureStore<AsyncReqwestClient>,
    pub search: AlgoliaClient<AsyncReqwestClient>,
}

fn require<'a>(
    value: &'a Option<String>,
    section: &str,
    key: &str,
    env: &str,
) -> Result<&'a str, ClientError> {
    value.as_deref().ok_or_else(|| {
        ClientError::Config(format!(
            "missing [{}] {} (or environment variable {})",
            section, key, env
        ))
    })
}

impl ServiceClients {
    /// Builds all clients, failing if any credential is missing.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ClientError> {
        let http = AsyncReqwestClient::with_timeout(config.http.timeout)?;
        Ok(Self {
            content: content_repository(config, http.clone())?,
            renderer: renderer(config)?,
            features: feature_store(config, http.clone())?,
            search: search_client(config, http)?,
        })
    }
}

/// The content repository client alone.
pub fn content_repository(
    config: &ConfigFile,
    http: AsyncReqwestClient,
) -> Result<GraphCmsClient<AsyncReqwestClient>, ClientError> {
    let api_url = require(&config.content.api_url, "content", "api_url", ENV_CONTENT_API_URL)?;
    let token = require(
        &config.content.api_token,
        "content",
        "api_token",
        ENV_CONTENT_API_TOKEN,
    )?;
    Ok(GraphCmsClient::new(http, api_url, token))
}

fn renderer(config: &ConfigFile) -> Result<MapboxRenderer, ClientError> {
    let settings = &config.render;
    let token = require(
        &settings.access_token,
        "render",
        "mapbox_access_token",
        ENV_MAPBOX_ACCESS_TOKEN,
    )?;
    Ok(MapboxRenderer::new(token)
        .with_style(settings.style.as_str())
        .with_size(settings.width, settings.height)
        .with_padding(settings.padding))
}

fn feature_store(
    config: &ConfigFile,
    http: AsyncReqwestClient,
) -> Result<AtlasFeatureStore<AsyncReqwestClient>, ClientError> {
    let settings = &config.features;
    let api_url = require(
        &settings.data_api_url,
        "features",
        "data_api_url",
        ENV_FEATURE_STORE_API_URL,
    )?;
    let api_key = require(&settings.api_key, "features", "api_key", ENV_FEATURE_STORE_API_KEY)?;
    Ok(
        AtlasFeatureStore::new(http, api_url, api_key, settings.database.as_str())
            .with_data_source(settings.data_source.as_str())
            .with_collection(settings.collection.as_str()),
    )
}

/// The search index client alone.
pub fn search_client(
    config: &ConfigFile,
    http: AsyncReqwestClient,
) -> Result<AlgoliaClient<AsyncReqwestClient>, ClientError> {
    let settings = &config.search;
    let application_id = require(
        &settings.application_id,
        "search",
        "application_id",
        ENV_SEARCH_APPLICATION_ID,
    )?;
    let api_key = require(
        &settings.admin_api_key,
        "search",
        "admin_api_key",
        ENV_SEARCH_ADMIN_API_KEY,
    )?;
    Ok(AlgoliaClient::new(http, application_id, api_key)
        .with_indexes(settings.cache_index.as_str(), settings.track_index.as_str()))
}
