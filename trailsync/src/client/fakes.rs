//! Recording in-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use super::types::ClientError;
use super::{CacheStore, ContentRepository, FeatureStore, MapRenderer, SearchIndex, StoredFeature};
use crate::cache::{CacheDocument, CacheKey, FeatureCategory};
use crate::feature::{FeatureCollection, Geometry};
use crate::geo::BoundingBox;
use crate::model::{AssetRef, Collection, TrackRecord, User, UserKind};

/// One call made against [`FakeContentRepository`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentCall {
    GetUser(String),
    GetCollection(String),
    GetTrack(String),
    UpdateCollection {
        id: String,
        geo_json: FeatureCollection,
        bounds: BoundingBox,
    },
    PublishCollection(String),
    UploadAsset(String),
    RenameAsset { id: String, file_name: String },
    PublishAsset(String),
    DeleteAsset(String),
    ConnectAsset { collection: String, asset: String },
}

/// Content repository holding fixed records and recording every call.
///
/// Uploaded assets are numbered `asset-1`, `asset-2`, ...
#[derive(Default)]
pub struct FakeContentRepository {
    users: HashMap<String, User>,
    collections: HashMap<String, Collection>,
    tracks: HashMap<String, TrackRecord>,
    failing: HashMap<&'static str, ClientError>,
    calls: Mutex<Vec<ContentCall>>,
    uploads: AtomicUsize,
}

impl FakeContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, kind: UserKind) -> Self {
        self.users.insert(id.to_string(), User { kind });
        self
    }

    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections.insert(collection.id.clone(), collection);
        self
    }

    pub fn with_track(mut self, track: TrackRecord) -> Self {
        self.tracks.insert(track.id.clone(), track);
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn failing(mut self, operation: &'static str, error: ClientError) -> Self {
        self.failing.insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<ContentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: ContentCall) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        match self.failing.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl ContentRepository for FakeContentRepository {
    async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.record("get_user", ContentCall::GetUser(id.to_string()))?;
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("user {}", id)))
    }

    async fn get_collection(&self, id: &str) -> Result<Collection, ClientError> {
        self.record("get_collection", ContentCall::GetCollection(id.to_string()))?;
        self.collections
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("collection {}", id)))
    }

    async fn get_track(&self, id: &str) -> Result<TrackRecord, ClientError> {
        self.record("get_track", ContentCall::GetTrack(id.to_string()))?;
        self.tracks
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("track {}", id)))
    }

    async fn update_collection(
        &self,
        id: &str,
        geo_json: &FeatureCollection,
        bounds: &BoundingBox,
    ) -> Result<(), ClientError> {
        self.record(
            "update_collection",
            ContentCall::UpdateCollection {
                id: id.to_string(),
                geo_json: geo_json.clone(),
                bounds: *bounds,
            },
        )
    }

    async fn publish_collection(&self, id: &str) -> Result<(), ClientError> {
        self.record("publish_collection", ContentCall::PublishCollection(id.to_string()))
    }

    async fn upload_asset(&self, image_url: &str) -> Result<AssetRef, ClientError> {
        self.record("upload_asset", ContentCall::UploadAsset(image_url.to_string()))?;
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AssetRef::new(format!("asset-{}", n)))
    }

    async fn rename_asset(&self, id: &str, file_name: &str) -> Result<(), ClientError> {
        self.record(
            "rename_asset",
            ContentCall::RenameAsset {
                id: id.to_string(),
                file_name: file_name.to_string(),
            },
        )
    }

    async fn publish_asset(&self, id: &str) -> Result<(), ClientError> {
        self.record("publish_asset", ContentCall::PublishAsset(id.to_string()))
    }

    async fn delete_asset(&self, id: &str) -> Result<(), ClientError> {
        self.record("delete_asset", ContentCall::DeleteAsset(id.to_string()))
    }

    async fn connect_asset(&self, collection_id: &str, asset_id: &str) -> Result<(), ClientError> {
        self.record(
            "connect_asset",
            ContentCall::ConnectAsset {
                collection: collection_id.to_string(),
                asset: asset_id.to_string(),
            },
        )
    }
}

/// Renderer returning `https://render.test/{n}` and recording its inputs.
#[derive(Default)]
pub struct FakeRenderer {
    renders: Mutex<Vec<(BoundingBox, FeatureCollection)>>,
    error: Option<ClientError>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ClientError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn renders(&self) -> Vec<(BoundingBox, FeatureCollection)> {
        self.renders.lock().unwrap().clone()
    }
}

impl MapRenderer for FakeRenderer {
    async fn render_map(
        &self,
        bounds: &BoundingBox,
        features: &FeatureCollection,
    ) -> Result<String, ClientError> {
        let mut renders = self.renders.lock().unwrap();
        renders.push((*bounds, features.clone()));
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(format!("https://render.test/{}", renders.len())),
        }
    }
}

/// Search index keeping the last object saved under each id.
#[derive(Default)]
pub struct FakeSearchIndex {
    objects: Mutex<HashMap<String, Value>>,
    saves: AtomicUsize,
}

impl FakeSearchIndex {
    pub fn object(&self, object_id: &str) -> Option<Value> {
        self.objects.lock().unwrap().get(object_id).cloned()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SearchIndex for FakeSearchIndex {
    async fn save_object(&self, object_id: &str, document: &Value) -> Result<(), ClientError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .insert(object_id.to_string(), document.clone());
        Ok(())
    }
}

/// Feature store answering from a fixed per-category table.
#[derive(Default)]
pub struct FakeFeatureStore {
    features: HashMap<FeatureCategory, Vec<StoredFeature>>,
    failing: Vec<FeatureCategory>,
    queries: Mutex<Vec<(FeatureCategory, Geometry)>>,
}

impl FakeFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(mut self, category: FeatureCategory, features: Vec<StoredFeature>) -> Self {
        self.features.insert(category, features);
        self
    }

    /// Makes queries for `category` fail.
    pub fn failing(mut self, category: FeatureCategory) -> Self {
        self.failing.push(category);
        self
    }

    pub fn queries(&self) -> Vec<(FeatureCategory, Geometry)> {
        self.queries.lock().unwrap().clone()
    }
}

impl FeatureStore for FakeFeatureStore {
    async fn find_intersecting(
        &self,
        category: FeatureCategory,
        polygon: &Geometry,
    ) -> Result<Vec<StoredFeature>, ClientError> {
        self.queries
            .lock()
            .unwrap()
            .push((category, polygon.clone()));
        if self.failing.contains(&category) {
            return Err(ClientError::Http("503 Service Unavailable".to_string()));
        }
        Ok(self.features.get(&category).cloned().unwrap_or_default())
    }
}

/// Cache store keeping one document per key and logging every write.
#[derive(Default)]
pub struct FakeCacheStore {
    entries: Mutex<HashMap<CacheKey, CacheDocument>>,
    writes: Mutex<Vec<CacheKey>>,
}

impl FakeCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> HashMap<CacheKey, CacheDocument> {
        self.entries.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<CacheKey> {
        self.writes.lock().unwrap().clone()
    }
}

impl CacheStore for FakeCacheStore {
    async fn upsert(&self, key: &CacheKey, document: &CacheDocument) -> Result<(), ClientError> {
        self.writes.lock().unwrap().push(key.clone());
        self.entries
            .lock()
            .unwrap()
            .insert(key.clone(), document.clone());
        Ok(())
    }
}
