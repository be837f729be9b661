//! Content repository records consumed by the pipeline.
//!
//! Field names follow the content repository's GraphQL schema (camelCase).
//! The pipeline only reads tracks and sub-collections; it mutates a
//! collection exclusively through [`crate::client::ContentRepository`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feature::FeatureCollection;
use crate::geo::{BoundingBox, Coordinate};

/// Opaque handle to an image in the content repository's asset store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: String,
}

impl AssetRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Kind of content repository account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserKind {
    /// A human project member, the only kind allowed to trigger the pipeline
    Member,
    /// Permanent auth tokens
    Pat,
    /// Public API access
    Public,
    /// Webhook-originated mutations
    Webhook,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub kind: UserKind,
}

impl User {
    pub fn is_member(&self) -> bool {
        self.kind == UserKind::Member
    }
}

/// Category type of a collection (e.g. "Region", "Trail").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryType {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackColor {
    pub hex: String,
}

/// A GPS track as attached to a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub geo_json: Option<FeatureCollection>,
    pub min_coords: Coordinate,
    pub max_coords: Coordinate,
    #[serde(default)]
    pub color: Option<TrackColor>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub total_elevation_loss: Option<f64>,
}

impl Track {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(self.min_coords, self.max_coords)
    }
}

/// A nested grouping inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCollection {
    pub name: String,
    pub min_coords: Coordinate,
    pub max_coords: Coordinate,
    #[serde(rename = "collectionType")]
    pub category_type: CategoryType,
}

impl SubCollection {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(self.min_coords, self.max_coords)
    }
}

/// The collection aggregate loaded at the start of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub sub_collections: Vec<SubCollection>,
    #[serde(default, rename = "staticImage")]
    pub preview_asset: Option<AssetRef>,
}

/// Start/end place names of a track.
///
/// Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLocation {
    #[serde(default)]
    pub start_city: Option<String>,
    #[serde(default)]
    pub start_state: Option<String>,
    #[serde(default)]
    pub start_country: Option<String>,
    #[serde(default)]
    pub end_city: Option<String>,
    #[serde(default)]
    pub end_state: Option<String>,
    #[serde(default)]
    pub end_country: Option<String>,
}

/// A collection a track belongs to, with one level of nested sub-collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMembership {
    pub name: String,
    #[serde(rename = "collectionType")]
    pub category_type: CategoryType,
    #[serde(default, rename = "subCollection")]
    pub sub_collections: Vec<CollectionMembership>,
}

/// Full track record used to build the track search document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub foreign_key: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub total_elevation_loss: Option<f64>,
    #[serde(default)]
    pub elev_low: Option<f64>,
    #[serde(default)]
    pub elev_high: Option<f64>,
    #[serde(default)]
    pub start_elevation: Option<f64>,
    #[serde(default)]
    pub end_elevation: Option<f64>,
    #[serde(flatten)]
    pub location: TrackLocation,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub overview_image_url: Option<String>,
    #[serde(default)]
    pub geo_json: Option<FeatureCollection>,
    #[serde(default)]
    pub collection: Vec<CollectionMembership>,
    #[serde(default)]
    pub difficulty: Option<Value>,
    #[serde(default)]
    pub fitness: Option<Value>,
    #[serde(default)]
    pub experience: Option<Value>,
}
