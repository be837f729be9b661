//! GraphCMS content repository client.
//!
//! Queries and mutations are posted to the project's content API with a
//! bearer token. Assets are imported through the REST `/upload` endpoint,
//! which fetches the image from a remote URL.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ClientError;
use super::ContentRepository;
use crate::feature::FeatureCollection;
use crate::geo::BoundingBox;
use crate::model::{AssetRef, Collection, TrackRecord, User};

const GET_USER: &str = r#"
query getUser($id: ID!) {
  user(where: { id: $id }) {
    kind
  }
}"#;

const GET_COLLECTION: &str = r#"
query getCollection($id: ID!) {
  collection(where: { id: $id }) {
    id
    name
    tracks {
      id
      name
      geoJson
      minCoords { latitude longitude }
      maxCoords { latitude longitude }
      color { hex }
      distance
      totalElevationGain
      totalElevationLoss
    }
    staticImage { id }
    subCollections {
      name
      minCoords { latitude longitude }
      maxCoords { latitude longitude }
      collectionType { name slug }
    }
  }
}"#;

const GET_TRACK: &str = r#"
query getTrack($id: ID!) {
  track(where: { id: $id }) {
    id
    name
    foreignKey
    date
    distance
    totalElevationGain
    totalElevationLoss
    elevLow
    elevHigh
    startElevation
    endElevation
    startCity
    startState
    startCountry
    endCity
    endState
    endCountry
    previewImageUrl
    overviewImageUrl
    geoJson
    difficulty
    fitness
    experience
    collection {
      name
      collectionType { name slug }
      subCollection {
        name
        collectionType { name slug }
      }
    }
  }
}"#;

const UPDATE_COLLECTION: &str = r#"
mutation updateCollection($id: ID!, $geoJson: Json, $minCoords: LocationInput, $maxCoords: LocationInput) {
  updateCollection(where: { id: $id }, data: { geoJson: $geoJson, minCoords: $minCoords, maxCoords: $maxCoords }) {
    id
  }
}"#;

const PUBLISH_COLLECTION: &str = r#"
mutation publishCollection($id: ID!) {
  publishCollection(where: { id: $id }, to: PUBLISHED) {
    id
  }
}"#;

const UPDATE_ASSET: &str = r#"
mutation updateAsset($id: ID!, $fileName: String) {
  updateAsset(where: { id: $id }, data: { fileName: $fileName }) {
    id
  }
}"#;

const PUBLISH_ASSET: &str = r#"
mutation publishAsset($id: ID!) {
  publishAsset(where: { id: $id }, to: PUBLISHED) {
    id
  }
}"#;

const DELETE_ASSET: &str = r#"
mutation deleteAsset($id: ID!) {
  deleteAsset(where: { id: $id }) {
    id
  }
}"#;

const CONNECT_STATIC_IMAGE: &str = r#"
mutation updateCollectionConnectAsset($collection: ID!, $asset: ID!) {
  updateCollection(where: { id: $collection }, data: { staticImage: { connect: { id: $asset } } }) {
    id
  }
}"#;

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct UserData {
    user: Option<User>,
}

#[derive(Deserialize)]
struct CollectionData {
    collection: Option<Collection>,
}

#[derive(Deserialize)]
struct TrackData {
    track: Option<TrackRecord>,
}

/// GraphCMS client over any [`AsyncHttpClient`].
pub struct GraphCmsClient<C: AsyncHttpClient> {
    http: C,
    api_url: String,
    authorization: String,
}

impl<C: AsyncHttpClient> GraphCmsClient<C> {
    /// Creates a client for the content API at `api_url`.
    pub fn new(http: C, api_url: impl Into<String>, token: &str) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            authorization: format!("Bearer {}", token),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/upload", self.api_url.trim_end_matches('/'))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, ClientError> {
        debug!(operation, "GraphCMS request");
        let body = json!({ "query": query, "variables": variables }).to_string();
        let bytes = self
            .http
            .post_json(
                &self.api_url,
                &[("Authorization", self.authorization.as_str())],
                &body,
            )
            .await?;

        let response: GraphQlResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", operation, e)))?;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(ClientError::GraphQl(format!(
                "{}: {}",
                operation,
                messages.join("; ")
            )));
        }

        response
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("{}: missing data", operation)))
    }

    async fn mutate(
        &self,
        operation: &str,
        mutation: &str,
        variables: Value,
    ) -> Result<(), ClientError> {
        self.request::<Value>(operation, mutation, variables)
            .await
            .map(|_| ())
    }
}

impl<C: AsyncHttpClient> ContentRepository for GraphCmsClient<C> {
    async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        let data: UserData = self.request("getUser", GET_USER, json!({ "id": id })).await?;
        data.user
            .ok_or_else(|| ClientError::NotFound(format!("user {}", id)))
    }

    async fn get_collection(&self, id: &str) -> Result<Collection, ClientError> {
        let data: CollectionData = self
            .request("getCollection", GET_COLLECTION, json!({ "id": id }))
            .await?;
        let mut collection = data
            .collection
            .ok_or_else(|| ClientError::NotFound(format!("collection {}", id)))?;
        if collection.id.is_empty() {
            collection.id = id.to_string();
        }
        Ok(collection)
    }

    async fn get_track(&self, id: &str) -> Result<TrackRecord, ClientError> {
        let data: TrackData = self
            .request("getTrack", GET_TRACK, json!({ "id": id }))
            .await?;
        data.track
            .ok_or_else(|| ClientError::NotFound(format!("track {}", id)))
    }

    async fn update_collection(
        &self,
        id: &str,
        geo_json: &FeatureCollection,
        bounds: &BoundingBox,
    ) -> Result<(), ClientError> {
        let variables = json!({
            "id": id,
            "geoJson": geo_json,
            "minCoords": bounds.min,
            "maxCoords": bounds.max,
        });
        self.mutate("updateCollection", UPDATE_COLLECTION, variables)
            .await
    }

    async fn publish_collection(&self, id: &str) -> Result<(), ClientError> {
        self.mutate("publishCollection", PUBLISH_COLLECTION, json!({ "id": id }))
            .await
    }

    async fn upload_asset(&self, image_url: &str) -> Result<AssetRef, ClientError> {
        let bytes = self
            .http
            .post_form(
                &self.upload_url(),
                &[("Authorization", self.authorization.as_str())],
                &[("url", image_url)],
            )
            .await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("upload: {}", e)))
    }

    async fn rename_asset(&self, id: &str, file_name: &str) -> Result<(), ClientError> {
        self.mutate(
            "updateAsset",
            UPDATE_ASSET,
            json!({ "id": id, "fileName": file_name }),
        )
        .await
    }

    async fn publish_asset(&self, id: &str) -> Result<(), ClientError> {
        self.mutate("publishAsset", PUBLISH_ASSET, json!({ "id": id }))
            .await
    }

    async fn delete_asset(&self, id: &str) -> Result<(), ClientError> {
        self.mutate("deleteAsset", DELETE_ASSET, json!({ "id": id }))
            .await
    }

    async fn connect_asset(&self, collection_id: &str, asset_id: &str) -> Result<(), ClientError> {
        self.mutate(
            "updateCollectionConnectAsset",
            CONNECT_STATIC_IMAGE,
            json!({ "collection": collection_id, "asset": asset_id }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAsyncHttpClient;
    use crate::geo::Coordinate;
    use crate::model::UserKind;

    const API: &str = "https://api.example.com/v2/project/master";

    #[tokio::test]
    async fn test_get_user_sends_bearer_and_variables() {
        let http = MockAsyncHttpClient::new()
            .respond_json(json!({ "data": { "user": { "kind": "MEMBER" } } }));
        let client = GraphCmsClient::new(http.clone(), API, "secret");

        let user = client.get_user("u1").await.unwrap();
        assert_eq!(user.kind, UserKind::Member);

        let request = &http.requests()[0];
        assert_eq!(request.url, API);
        assert_eq!(
            request.headers,
            vec![("Authorization".to_string(), "Bearer secret".to_string())]
        );
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["variables"]["id"], "u1");
        assert!(body["query"].as_str().unwrap().contains("user(where"));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let http = MockAsyncHttpClient::new().respond_json(json!({ "data": { "collection": null } }));
        let client = GraphCmsClient::new(http, API, "secret");

        let err = client.get_collection("c1").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_surfaced() {
        let http = MockAsyncHttpClient::new().respond_json(json!({
            "data": null,
            "errors": [{ "message": "not allowed" }, { "message": "try again" }]
        }));
        let client = GraphCmsClient::new(http, API, "secret");

        let err = client.publish_collection("c1").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::GraphQl("publishCollection: not allowed; try again".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_collection_fills_requested_id() {
        let http = MockAsyncHttpClient::new().respond_json(json!({
            "data": { "collection": { "name": "Tahoe Rim", "tracks": [], "subCollections": [] } }
        }));
        let client = GraphCmsClient::new(http, API, "secret");

        let collection = client.get_collection("c1").await.unwrap();
        assert_eq!(collection.id, "c1");
        assert_eq!(collection.name, "Tahoe Rim");
        assert!(collection.preview_asset.is_none());
    }

    #[tokio::test]
    async fn test_update_collection_variables() {
        let http = MockAsyncHttpClient::new().respond_json(json!({ "data": { "updateCollection": { "id": "c1" } } }));
        let client = GraphCmsClient::new(http.clone(), API, "secret");
        let bounds = BoundingBox {
            min: Coordinate {
                latitude: 1.0,
                longitude: 2.0,
            },
            max: Coordinate {
                latitude: 3.0,
                longitude: 4.0,
            },
        };

        client
            .update_collection("c1", &FeatureCollection::default(), &bounds)
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&http.requests()[0].body).unwrap();
        assert_eq!(body["variables"]["minCoords"], json!({ "latitude": 1.0, "longitude": 2.0 }));
        assert_eq!(body["variables"]["maxCoords"], json!({ "latitude": 3.0, "longitude": 4.0 }));
        assert_eq!(body["variables"]["geoJson"]["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_upload_asset_posts_form_to_upload_endpoint() {
        let http = MockAsyncHttpClient::new().respond_json(json!({ "id": "asset-9", "handle": "x" }));
        let client = GraphCmsClient::new(http.clone(), format!("{}/", API), "secret");

        let asset = client
            .upload_asset("https://img.example.com/map.png")
            .await
            .unwrap();
        assert_eq!(asset, AssetRef::new("asset-9"));

        let request = &http.requests()[0];
        assert_eq!(request.url, format!("{}/upload", API));
        assert_eq!(request.body, "url=https://img.example.com/map.png");
    }

    #[tokio::test]
    async fn test_connect_asset_variables() {
        let http = MockAsyncHttpClient::new();
        let client = GraphCmsClient::new(http.clone(), API, "secret");
        // Mock answers `{}` which has no data field
        let err = client.connect_asset("c1", "a1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        let body: Value = serde_json::from_str(&http.requests()[0].body).unwrap();
        assert_eq!(body["variables"], json!({ "collection": "c1", "asset": "a1" }));
    }
}
