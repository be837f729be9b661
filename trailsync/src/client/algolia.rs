//! Algolia client for the cache and track search indexes.
//!
//! Both indexes are written with `PUT /1/indexes/{index}/{objectID}`,
//! which creates the object or replaces it entirely. Re-running a write
//! with the same payload leaves the index unchanged.

use reqwest::Url;
use serde_json::{json, Value};
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ClientError;
use super::{CacheStore, SearchIndex};
use crate::cache::{CacheDocument, CacheKey};
use crate::geo::Coordinate;

/// Default index holding per-category collection cache entries.
pub const DEFAULT_CACHE_INDEX: &str = "cache";

/// Default index holding one document per track.
pub const DEFAULT_TRACK_INDEX: &str = "tracks";

/// Algolia REST client implementing [`CacheStore`] and [`SearchIndex`].
pub struct AlgoliaClient<C: AsyncHttpClient> {
    http: C,
    application_id: String,
    api_key: String,
    cache_index: String,
    track_index: String,
}

impl<C: AsyncHttpClient> AlgoliaClient<C> {
    pub fn new(http: C, application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            application_id: application_id.into(),
            api_key: api_key.into(),
            cache_index: DEFAULT_CACHE_INDEX.to_string(),
            track_index: DEFAULT_TRACK_INDEX.to_string(),
        }
    }

    pub fn with_indexes(mut self, cache_index: impl Into<String>, track_index: impl Into<String>) -> Self {
        self.cache_index = cache_index.into();
        self.track_index = track_index.into();
        self
    }

    fn object_url(&self, index: &str, object_id: &str) -> Result<String, ClientError> {
        let mut url = Url::parse(&format!("https://{}.algolia.net", self.application_id))
            .map_err(|e| ClientError::Config(format!("Algolia application id: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("Algolia URL cannot have a path".to_string()))?
            .extend(["1", "indexes", index, object_id]);
        Ok(url.into())
    }

    async fn put_object(&self, index: &str, object_id: &str, body: &Value) -> Result<(), ClientError> {
        let url = self.object_url(index, object_id)?;
        debug!(index, object_id, "Saving search object");
        self.http
            .put_json(
                &url,
                &[
                    ("X-Algolia-Application-Id", self.application_id.as_str()),
                    ("X-Algolia-API-Key", self.api_key.as_str()),
                ],
                &body.to_string(),
            )
            .await
            .map(|_| ())
    }
}

fn lat_lon(coordinate: &Coordinate) -> Value {
    json!({ "lat": coordinate.latitude, "lon": coordinate.longitude })
}

/// The stored form of a cache entry.
pub(crate) fn cache_object(key: &CacheKey, document: &CacheDocument) -> Value {
    let geoloc: Vec<Value> = document
        .bounds
        .corners()
        .iter()
        .map(|c| json!({ "lat": c.latitude, "lng": c.longitude }))
        .collect();

    json!({
        "objectID": key.object_id(),
        "name": key.name,
        "type": key.record_type,
        "feature": key.category.as_str(),
        "geoJson": document.geo_json,
        "minCoords": lat_lon(&document.bounds.min),
        "maxCoords": lat_lon(&document.bounds.max),
        "_geoloc": geoloc,
    })
}

impl<C: AsyncHttpClient> CacheStore for AlgoliaClient<C> {
    async fn upsert(&self, key: &CacheKey, document: &CacheDocument) -> Result<(), ClientError> {
        let body = cache_object(key, document);
        self.put_object(&self.cache_index, &key.object_id(), &body)
            .await
    }
}

impl<C: AsyncHttpClient> SearchIndex for AlgoliaClient<C> {
    async fn save_object(&self, object_id: &str, document: &Value) -> Result<(), ClientError> {
        let mut body = document.clone();
        if let Some(fields) = body.as_object_mut() {
            fields.insert("objectID".to_string(), json!(object_id));
        }
        self.put_object(&self.track_index, object_id, &body).await
    }
}
