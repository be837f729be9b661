//! Representative-feature selection for tracks and stored features.

use rand::Rng;
use serde_json::Value;
use tracing::warn;

use super::{track_color, FeatureCollection, GeometryFeature, TIME_SERIES_PROPERTY};
use crate::geo::Coordinate;
use crate::model::Track;

/// Picks the feature with the largest `distance` property.
///
/// Scans left to right and only replaces the current pick on a strictly
/// greater distance, so the first of several equal features wins. Features
/// without a numeric distance never beat one that has it. Features with a
/// null geometry are never picked.
pub fn select_representative(collection: &FeatureCollection) -> Option<&GeometryFeature> {
    let mut features = collection
        .features
        .iter()
        .filter(|feature| feature.geometry.is_some());
    let mut best = features.next()?;
    let mut best_distance = best.distance().unwrap_or(f64::NEG_INFINITY);

    for feature in features {
        let distance = feature.distance().unwrap_or(f64::NEG_INFINITY);
        if distance > best_distance {
            best = feature;
            best_distance = distance;
        }
    }

    Some(best)
}

/// Copy of the representative feature with the time series stripped.
pub fn representative_feature(collection: &FeatureCollection) -> Option<GeometryFeature> {
    select_representative(collection)
        .map(|feature| feature.clone().without_property(TIME_SERIES_PROPERTY))
}

/// Representative features of a set of tracks plus the corner points that
/// feed the aggregate bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSelection {
    pub features: Vec<GeometryFeature>,
    pub coordinates: Vec<Coordinate>,
    /// Ids of tracks that carried no geometry.
    pub skipped: Vec<String>,
}

/// Turns a collection's tracks into one styled feature each.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureSelector;

impl FeatureSelector {
    pub fn new() -> Self {
        Self
    }

    /// Builds the representative feature for the track at `index`.
    ///
    /// Returns `None` if the track has no geometry.
    pub fn select_track<R: Rng + ?Sized>(
        &self,
        track: &Track,
        index: usize,
        rng: &mut R,
    ) -> Option<GeometryFeature> {
        let feature = representative_feature(track.geo_json.as_ref()?)?;
        let color = track_color(track.color.as_ref().map(|c| c.hex.as_str()), index, rng);

        Some(
            feature
                .with_property("id", track.id.as_str())
                .with_property("name", track.name.as_str())
                .with_property("distance", optional_number(track.distance))
                .with_property("totalElevationGain", optional_number(track.total_elevation_gain))
                .with_property("totalElevationLoss", optional_number(track.total_elevation_loss))
                .with_property("color", color),
        )
    }

    /// Selects every track in order. Both corners of each track's stored
    /// bounding box are always collected, with or without geometry.
    pub fn select_tracks<R: Rng + ?Sized>(&self, tracks: &[Track], rng: &mut R) -> TrackSelection {
        let mut selection = TrackSelection::default();

        for (index, track) in tracks.iter().enumerate() {
            match self.select_track(track, index, rng) {
                Some(feature) => selection.features.push(feature),
                None => {
                    warn!(track = %track.id, name = %track.name, "Track has no geometry features");
                    selection.skipped.push(track.id.clone());
                }
            }
            let bounds = track.bounding_box();
            selection.coordinates.push(bounds.min);
            selection.coordinates.push(bounds.max);
        }

        selection
    }
}

fn optional_number(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}
