//! Track search documents.
//!
//! One document per track, keyed by the track's foreign key, carrying the
//! display fields, every coordinate of the first feature as `_geoloc`, and
//! the location and collection facets.

use chrono::{DateTime, NaiveDate};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::category::derive_facets;
use crate::client::{Collaborator, ContentRepository, SearchIndex};
use crate::model::TrackRecord;
use crate::pipeline::{authorize, PipelineError, SkipReason};

/// How a track index request ended without error.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    Skipped(SkipReason),
    Indexed { object_id: String },
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
/// into unix seconds.
pub fn date_seconds(date: &str) -> Option<f64> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Some(timestamp.timestamp_millis() as f64 / 1000.0);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp() as f64)
}

fn geoloc(record: &TrackRecord) -> Vec<Value> {
    record
        .geo_json
        .as_ref()
        .and_then(|collection| collection.features.first())
        .and_then(|feature| feature.geometry.as_ref())
        .map(|geometry| {
            geometry
                .positions()
                .into_iter()
                .map(|[lng, lat]| json!({ "lat": lat, "lng": lng }))
                .collect()
        })
        .unwrap_or_default()
}

/// Builds the search document for `record`.
pub fn track_document(record: &TrackRecord) -> Value {
    let date = record.date.as_deref().and_then(|raw| {
        let seconds = date_seconds(raw);
        if seconds.is_none() {
            warn!(track = %record.id, date = raw, "Unparseable track date");
        }
        seconds
    });
    let location = &record.location;

    let mut document = json!({
        "name": record.name,
        "date": date,
        "distance": record.distance,
        "totalElevationGain": record.total_elevation_gain,
        "totalElevationLoss": record.total_elevation_loss,
        "elevLow": record.elev_low,
        "elevHigh": record.elev_high,
        "startElevation": record.start_elevation,
        "endElevation": record.end_elevation,
        "startCity": location.start_city,
        "startState": location.start_state,
        "startCountry": location.start_country,
        "endCity": location.end_city,
        "endState": location.end_state,
        "endCountry": location.end_country,
        "previewImageUrl": record.preview_image_url,
        "overviewImageUrl": record.overview_image_url,
        "_geoloc": geoloc(record),
        "difficulty": record.difficulty,
        "fitness": record.fitness,
        "experience": record.experience,
    });

    if let Value::Object(fields) = &mut document {
        let facets: Map<String, Value> = derive_facets(location, &record.collection)
            .into_iter()
            .map(|(path, values)| (path, json!(values)))
            .collect();
        fields.extend(facets);
    }
    document
}

/// Writes track documents to the search index.
pub struct TrackIndexer<'a, R, S> {
    content: &'a R,
    index: &'a S,
}

impl<'a, R: ContentRepository, S: SearchIndex> TrackIndexer<'a, R, S> {
    pub fn new(content: &'a R, index: &'a S) -> Self {
        Self { content, index }
    }

    /// Loads the track and replaces its search document.
    ///
    /// Only member publishes are indexed, as for collections.
    pub async fn index(
        &self,
        track_id: &str,
        published_by: Option<&str>,
    ) -> Result<IndexOutcome, PipelineError> {
        if let Some(reason) = authorize(self.content, published_by).await? {
            return Ok(IndexOutcome::Skipped(reason));
        }

        let record = self
            .content
            .get_track(track_id)
            .await
            .map_err(|e| PipelineError::remote(Collaborator::ContentRepository, "get_track", e))?;
        let document = track_document(&record);

        self.index
            .save_object(&record.foreign_key, &document)
            .await
            .map_err(|e| PipelineError::remote(Collaborator::SearchIndex, "save_object", e))?;

        info!(track = track_id, object_id = %record.foreign_key, "Track indexed");
        Ok(IndexOutcome::Indexed {
            object_id: record.foreign_key,
        })
    }
}
