//! External collaborator contracts and their HTTP implementations.
//!
//! The pipeline is generic over these traits; concrete clients are
//! constructed once and passed in, so tests can substitute recording fakes.
//!
//! # Factory
//!
//! ```ignore
//! use trailsync::client::ServiceClients;
//! use trailsync::config::ConfigFile;
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env(|name| std::env::var(name).ok());
//! let clients = ServiceClients::from_config(&config)?;
//! ```

mod algolia;
mod atlas;
mod factory;
#[cfg(test)]
pub(crate) mod fakes;
mod graphcms;
mod http;
mod mapbox;
mod types;

pub use algolia::{AlgoliaClient, DEFAULT_CACHE_INDEX, DEFAULT_TRACK_INDEX};
pub use atlas::{AtlasFeatureStore, DEFAULT_COLLECTION, DEFAULT_DATA_SOURCE};
pub use factory::{content_repository, search_client, ServiceClients};
pub use graphcms::GraphCmsClient;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use mapbox::{
    MapboxRenderer, DEFAULT_HEIGHT, DEFAULT_PADDING, DEFAULT_STYLE, DEFAULT_WIDTH, MAX_URL_LENGTH,
};
pub use types::{ClientError, Collaborator};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};

use std::future::Future;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{CacheDocument, CacheKey, FeatureCategory};
use crate::feature::{FeatureCollection, Geometry};
use crate::geo::BoundingBox;
use crate::model::{AssetRef, Collection, TrackRecord, User};

/// Headless CMS holding tracks, collections, users and assets.
pub trait ContentRepository: Send + Sync {
    fn get_user(&self, id: &str) -> impl Future<Output = Result<User, ClientError>> + Send;

    fn get_collection(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Collection, ClientError>> + Send;

    fn get_track(&self, id: &str) -> impl Future<Output = Result<TrackRecord, ClientError>> + Send;

    /// Stores the aggregated geometry and bounding box on a collection.
    fn update_collection(
        &self,
        id: &str,
        geo_json: &FeatureCollection,
        bounds: &BoundingBox,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn publish_collection(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Imports a remote image into the asset store.
    fn upload_asset(
        &self,
        image_url: &str,
    ) -> impl Future<Output = Result<AssetRef, ClientError>> + Send;

    fn rename_asset(
        &self,
        id: &str,
        file_name: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn publish_asset(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete_asset(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Sets the collection's single preview-image relation.
    fn connect_asset(
        &self,
        collection_id: &str,
        asset_id: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Static map image service.
pub trait MapRenderer: Send + Sync {
    /// Returns a URL from which the rendered image can be fetched.
    fn render_map(
        &self,
        bounds: &BoundingBox,
        features: &FeatureCollection,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// A feature as kept in the geo-queryable feature store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFeature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "crate::feature::null_as_default")]
    pub geo_json: FeatureCollection,
}

/// Geo-queryable store of features.
pub trait FeatureStore: Send + Sync {
    /// All features of `category` whose stored geometry intersects `polygon`.
    fn find_intersecting(
        &self,
        category: FeatureCategory,
        polygon: &Geometry,
    ) -> impl Future<Output = Result<Vec<StoredFeature>, ClientError>> + Send;
}

/// Secondary search-cache store.
pub trait CacheStore: Send + Sync {
    /// Creates the entry for `key` or fully replaces an existing one.
    fn upsert(
        &self,
        key: &CacheKey,
        document: &CacheDocument,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Search index accepting whole-object writes.
pub trait SearchIndex: Send + Sync {
    /// Creates or replaces the object with `object_id`.
    fn save_object(
        &self,
        object_id: &str,
        document: &Value,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
