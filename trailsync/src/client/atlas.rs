//! Feature store backed by the MongoDB Atlas Data API.
//!
//! Features live in a collection with a `2dsphere` index on `geometry`.
//! Category lookups are a single `find` action with a `$geoIntersects`
//! filter against the query polygon.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ClientError;
use super::{FeatureStore, StoredFeature};
use crate::cache::FeatureCategory;
use crate::feature::Geometry;

/// Default Atlas data source (cluster) name.
pub const DEFAULT_DATA_SOURCE: &str = "Cluster0";

/// Default collection holding features.
pub const DEFAULT_COLLECTION: &str = "features";

#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    documents: Vec<StoredFeature>,
}

/// Atlas Data API client implementing [`FeatureStore`].
pub struct AtlasFeatureStore<C: AsyncHttpClient> {
    http: C,
    api_url: String,
    api_key: String,
    data_source: String,
    database: String,
    collection: String,
}

impl<C: AsyncHttpClient> AtlasFeatureStore<C> {
    /// Creates a store client for `database` behind the Data API at `api_url`.
    pub fn new(
        http: C,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            database: database.into(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    fn find_url(&self) -> String {
        format!("{}/action/find", self.api_url.trim_end_matches('/'))
    }

    fn find_body(&self, category: FeatureCategory, polygon: &Geometry) -> Value {
        json!({
            "dataSource": self.data_source,
            "database": self.database,
            "collection": self.collection,
            "filter": {
                "type": category.as_str(),
                "geometry": {
                    "$geoIntersects": {
                        "$geometry": polygon,
                    }
                }
            }
        })
    }
}

impl<C: AsyncHttpClient> FeatureStore for AtlasFeatureStore<C> {
    async fn find_intersecting(
        &self,
        category: FeatureCategory,
        polygon: &Geometry,
    ) -> Result<Vec<StoredFeature>, ClientError> {
        let body = self.find_body(category, polygon).to_string();
        let bytes = self
            .http
            .post_json(&self.find_url(), &[("api-key", self.api_key.as_str())], &body)
            .await?;

        let response: FindResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("find {}: {}", category, e)))?;
        debug!(
            category = %category,
            matches = response.documents.len(),
            "Feature store query complete"
        );
        Ok(response.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAsyncHttpClient;
    use crate::geo::{BoundingBox, Coordinate};

    fn polygon() -> Geometry {
        Geometry::bounding_polygon(&BoundingBox {
            min: Coordinate {
                latitude: 10.0,
                longitude: 20.0,
            },
            max: Coordinate {
                latitude: 11.0,
                longitude: 21.0,
            },
        })
    }

    #[tokio::test]
    async fn test_find_posts_geo_intersect_filter() {
        let http = MockAsyncHttpClient::new().respond_json(json!({ "documents": [] }));
        let store = AtlasFeatureStore::new(http.clone(), "https://data.example.com/v1/", "key", "trails")
            .with_collection("things");

        let found = store
            .find_intersecting(FeatureCategory::Pass, &polygon())
            .await
            .unwrap();
        assert!(found.is_empty());

        let request = &http.requests()[0];
        assert_eq!(request.url, "https://data.example.com/v1/action/find");
        assert_eq!(
            request.headers,
            vec![("api-key".to_string(), "key".to_string())]
        );
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["dataSource"], DEFAULT_DATA_SOURCE);
        assert_eq!(body["database"], "trails");
        assert_eq!(body["collection"], "things");
        assert_eq!(body["filter"]["type"], "pass");
        let geometry = &body["filter"]["geometry"]["$geoIntersects"]["$geometry"];
        assert_eq!(geometry["type"], "Polygon");
        assert_eq!(geometry["coordinates"][0][2], json!([21.0, 11.0]));
    }

    #[tokio::test]
    async fn test_find_decodes_documents() {
        let http = MockAsyncHttpClient::new().respond_json(json!({
            "documents": [{
                "name": "Echo Summit",
                "type": "pass",
                "geoJson": {
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [20.5, 10.5] },
                        "properties": { "distance": 0.0 }
                    }]
                }
            }]
        }));
        let store = AtlasFeatureStore::new(http, "https://data.example.com", "key", "trails");

        let found = store
            .find_intersecting(FeatureCategory::Pass, &polygon())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("Echo Summit"));
        assert_eq!(found[0].geo_json.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let http = MockAsyncHttpClient::new().respond_error(ClientError::Http("boom".to_string()));
        let store = AtlasFeatureStore::new(http, "https://data.example.com", "key", "trails");

        let err = store
            .find_intersecting(FeatureCategory::Book, &polygon())
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Http("boom".to_string()));
    }
}
