//! Feature-store to cache-store synchronization.
//!
//! For each feature category, the features intersecting a collection's
//! bounding box are reduced to their representative geometry and written
//! as one cache entry per `(name, "Collection", category)` key. Writes are
//! full replacements, so re-running converges on the same stored state.
//!
//! Categories with no matches are skipped and any entry left over from an
//! earlier run stays in place.

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::types::{CacheDocument, CacheKey, FeatureCategory};
use crate::client::{CacheStore, Collaborator, FeatureStore, StoredFeature};
use crate::feature::{representative_feature, FeatureCollection, Geometry, GeometryFeature};
use crate::geo::BoundingBox;
use crate::pipeline::{CategoryFailure, PipelineError};

/// What happened to each category in one synchronization run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSyncReport {
    /// Categories written, with the number of features stored
    pub upserted: Vec<(FeatureCategory, usize)>,
    /// Categories with nothing to store
    pub skipped: Vec<FeatureCategory>,
}

enum CategoryOutcome {
    Upserted(usize),
    Skipped,
}

/// Representative geometry of one stored feature.
///
/// Features carrying their own feature collection are reduced with the
/// max-distance rule. Point-like features fall back to their indexed
/// geometry, labelled with their name.
fn stored_representative(stored: &StoredFeature) -> Option<GeometryFeature> {
    if let Some(feature) = representative_feature(&stored.geo_json) {
        return Some(feature);
    }
    let geometry: &Geometry = stored.geometry.as_ref()?;
    let mut feature = GeometryFeature::new(geometry.clone(), Default::default());
    if let Some(name) = &stored.name {
        feature = feature.with_property("name", name.as_str());
    }
    Some(feature)
}

/// Rebuilds the per-category cache entries of one collection.
pub struct CacheSynchronizer<'a, F, C> {
    features: &'a F,
    cache: &'a C,
}

impl<'a, F: FeatureStore, C: CacheStore> CacheSynchronizer<'a, F, C> {
    pub fn new(features: &'a F, cache: &'a C) -> Self {
        Self { features, cache }
    }

    /// Synchronizes every category for the collection `name`.
    ///
    /// All categories are attempted even if some fail; failures are
    /// returned together as [`PipelineError::CacheSync`].
    pub async fn sync(
        &self,
        name: &str,
        bounds: &BoundingBox,
    ) -> Result<CacheSyncReport, PipelineError> {
        let polygon = Geometry::bounding_polygon(bounds);
        let results = join_all(
            FeatureCategory::ALL
                .iter()
                .map(|&category| self.sync_category(name, category, bounds, &polygon)),
        )
        .await;

        let mut report = CacheSyncReport::default();
        let mut failures = Vec::new();
        for (category, result) in FeatureCategory::ALL.into_iter().zip(results) {
            match result {
                Ok(CategoryOutcome::Upserted(count)) => report.upserted.push((category, count)),
                Ok(CategoryOutcome::Skipped) => report.skipped.push(category),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            warn!(
                collection = name,
                failed = failures.len(),
                "Cache synchronization incomplete"
            );
            return Err(PipelineError::CacheSync { failures });
        }

        info!(
            collection = name,
            upserted = report.upserted.len(),
            skipped = report.skipped.len(),
            "Cache synchronized"
        );
        Ok(report)
    }

    async fn sync_category(
        &self,
        name: &str,
        category: FeatureCategory,
        bounds: &BoundingBox,
        polygon: &Geometry,
    ) -> Result<CategoryOutcome, CategoryFailure> {
        let matches = self
            .features
            .find_intersecting(category, polygon)
            .await
            .map_err(|error| {
                warn!(collection = name, category = %category, error = %error, "Feature query failed");
                CategoryFailure {
                    category,
                    collaborator: Collaborator::FeatureStore,
                    error,
                }
            })?;

        if matches.is_empty() {
            debug!(collection = name, category = %category, "No intersecting features");
            return Ok(CategoryOutcome::Skipped);
        }

        let features: Vec<GeometryFeature> =
            matches.iter().filter_map(stored_representative).collect();
        if features.is_empty() {
            warn!(
                collection = name,
                category = %category,
                matches = matches.len(),
                "Intersecting features carry no geometry"
            );
            return Ok(CategoryOutcome::Skipped);
        }

        let count = features.len();
        let key = CacheKey::collection(name, category);
        let document = CacheDocument {
            geo_json: FeatureCollection::new(features),
            bounds: *bounds,
        };
        self.cache.upsert(&key, &document).await.map_err(|error| {
            warn!(collection = name, category = %category, error = %error, "Cache upsert failed");
            CategoryFailure {
                category,
                collaborator: Collaborator::CacheStore,
                error,
            }
        })?;

        debug!(collection = name, category = %category, features = count, "Cache entry upserted");
        Ok(CategoryOutcome::Upserted(count))
    }
}
