//! GeoJSON feature types and representative-feature selection.
//!
//! Features are plain values: every transform here returns a new feature
//! instead of mutating a shared property map.

mod color;
mod select;

pub use color::{random_color, track_color, TRACK_PALETTE};
pub use select::{representative_feature, select_representative, FeatureSelector, TrackSelection};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geo::BoundingBox;

/// Transient per-point timestamp array emitted by GPX converters.
pub const TIME_SERIES_PROPERTY: &str = "coordTimes";

/// Free-form feature properties.
pub type Properties = Map<String, Value>;

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

impl Geometry {
    /// A single-ring polygon covering `bounds`.
    pub fn bounding_polygon(bounds: &BoundingBox) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates: serde_json::json!([bounds.ring()]),
        }
    }

    /// Every `[lon, lat]` position in the geometry, flattened in order.
    ///
    /// Works for any nesting depth (Point, LineString, Polygon, Multi*).
    pub fn positions(&self) -> Vec<[f64; 2]> {
        let mut out = Vec::new();
        collect_positions(&self.coordinates, &mut out);
        out
    }
}

fn collect_positions(value: &Value, out: &mut Vec<[f64; 2]>) {
    let Some(items) = value.as_array() else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lon), Some(lat)) => out.push([lon, lat]),
        _ => items.iter().for_each(|item| collect_positions(item, out)),
    }
}

/// A GeoJSON feature: geometry plus properties.
///
/// `geometry` is `None` for unlocated features (`"geometry": null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFeature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

fn feature_kind() -> String {
    "Feature".to_string()
}

/// Decodes an explicit `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GeometryFeature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            kind: feature_kind(),
            geometry: Some(geometry),
            properties,
        }
    }

    /// The recorded `distance` property, if numeric.
    pub fn distance(&self) -> Option<f64> {
        self.properties.get("distance").and_then(Value::as_f64)
    }

    /// Returns a copy with `key` set to `value`, overwriting any existing entry.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Returns a copy without `key`.
    pub fn without_property(mut self, key: &str) -> Self {
        self.properties.remove(key);
        self
    }
}

/// Ordered sequence of features. Insertion order is processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_kind")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<GeometryFeature>,
}

fn collection_kind() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn new(features: Vec<GeometryFeature>) -> Self {
        Self {
            kind: collection_kind(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
