//! Collection publish pipeline.
//!
//! ```text
//! Start -> Authorized -> Fetched -> [TracksBranch] -> [SubCollectionsBranch] -> Published -> Done
//!                                                    any failure -> Aborted
//! ```
//!
//! Both branches run when their input is non-empty, tracks first. Each
//! branch persists its own geometry and refreshes the preview asset; the
//! sub-collection branch's asset supersedes the one the tracks branch
//! attached moments earlier.

use std::fmt;

use tracing::{info, warn};

use super::error::PipelineError;
use super::event::{authorize, PublishEvent, SkipReason};
use crate::asset::{AssetLifecycleManager, AssetReport, AssetRequest};
use crate::boundary::{boundary_feature, sub_collection_features};
use crate::cache::{CacheSyncReport, CacheSynchronizer};
use crate::client::{CacheStore, ClientError, Collaborator, ContentRepository, FeatureStore, MapRenderer};
use crate::feature::{FeatureCollection, FeatureSelector};
use crate::geo::{bounding_box, BoundingBox};
use crate::model::{AssetRef, Collection};

/// Position of one invocation in the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Authorized,
    Fetched,
    TracksBranch,
    SubCollectionsBranch,
    Published,
    Done,
    /// Terminal failure state. Only logged; a failed run returns its error.
    Aborted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of the tracks branch.
#[derive(Debug, Clone, PartialEq)]
pub struct TracksBranchReport {
    pub bounds: BoundingBox,
    /// Representative features stored on the collection
    pub features: usize,
    /// Ids of tracks without geometry
    pub skipped_tracks: Vec<String>,
    pub cache: CacheSyncReport,
    pub asset: AssetReport,
}

/// Result of the sub-collections branch.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCollectionsBranchReport {
    pub bounds: BoundingBox,
    pub features: usize,
    pub asset: AssetReport,
}

/// A collection that was processed and published.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub collection_id: String,
    pub tracks: Option<TracksBranchReport>,
    pub sub_collections: Option<SubCollectionsBranchReport>,
    /// States entered, in order
    pub states: Vec<PipelineState>,
}

impl PublishReport {
    /// The preview asset left attached to the collection, if any branch ran.
    pub fn attached_asset(&self) -> Option<&AssetRef> {
        self.sub_collections
            .as_ref()
            .map(|branch| &branch.asset.asset)
            .or_else(|| self.tracks.as_ref().map(|branch| &branch.asset.asset))
    }
}

/// How an invocation ended without error.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Deliberate no-op; nothing was read or written beyond authorization
    Skipped(SkipReason),
    Published(PublishReport),
}

struct Run<'e> {
    collection_id: &'e str,
    states: Vec<PipelineState>,
}

impl<'e> Run<'e> {
    fn new(collection_id: &'e str) -> Self {
        Self {
            collection_id,
            states: vec![PipelineState::Start],
        }
    }

    fn enter(&mut self, state: PipelineState) {
        info!(collection = self.collection_id, state = %state, "Pipeline state");
        self.states.push(state);
    }

    /// The furthest state entered so far.
    fn reached(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Start)
    }
}

fn content_error(operation: &'static str) -> impl FnOnce(ClientError) -> PipelineError {
    move |error| PipelineError::remote(Collaborator::ContentRepository, operation, error)
}

/// Runs the publish pipeline for collections.
///
/// Generic over every collaborator; clients are constructed by the caller
/// and borrowed for the pipeline's lifetime.
pub struct CollectionPipeline<'a, R, M, F, C> {
    content: &'a R,
    renderer: &'a M,
    features: &'a F,
    cache: &'a C,
}

impl<'a, R, M, F, C> CollectionPipeline<'a, R, M, F, C>
where
    R: ContentRepository,
    M: MapRenderer,
    F: FeatureStore,
    C: CacheStore,
{
    pub fn new(content: &'a R, renderer: &'a M, features: &'a F, cache: &'a C) -> Self {
        Self {
            content,
            renderer,
            features,
            cache,
        }
    }

    /// Processes one publish event.
    ///
    /// Remote failures abort the invocation and are returned unchanged; the
    /// caller owns retries. Re-running after a failure is safe.
    pub async fn handle(&self, event: &PublishEvent) -> Result<PipelineOutcome, PipelineError> {
        let mut run = Run::new(&event.id);
        match self.process(event, &mut run).await {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                warn!(
                    collection = %event.id,
                    state = %PipelineState::Aborted,
                    reached = %run.reached(),
                    error = %error,
                    "Pipeline aborted"
                );
                Err(error)
            }
        }
    }

    async fn process(
        &self,
        event: &PublishEvent,
        run: &mut Run<'_>,
    ) -> Result<PipelineOutcome, PipelineError> {
        if let Some(reason) = authorize(self.content, event.published_by.as_deref()).await? {
            return Ok(PipelineOutcome::Skipped(reason));
        }
        run.enter(PipelineState::Authorized);

        let collection = self
            .content
            .get_collection(&event.id)
            .await
            .map_err(content_error("get_collection"))?;
        run.enter(PipelineState::Fetched);

        let mut current = collection.preview_asset.clone();

        let tracks = if collection.tracks.is_empty() {
            None
        } else {
            run.enter(PipelineState::TracksBranch);
            let report = self.tracks_branch(&collection, current.as_ref()).await?;
            current = Some(report.asset.asset.clone());
            Some(report)
        };

        let sub_collections = if collection.sub_collections.is_empty() {
            None
        } else {
            run.enter(PipelineState::SubCollectionsBranch);
            Some(
                self.sub_collections_branch(&collection, current.as_ref())
                    .await?,
            )
        };

        self.content
            .publish_collection(&collection.id)
            .await
            .map_err(content_error("publish_collection"))?;
        run.enter(PipelineState::Published);
        run.enter(PipelineState::Done);

        Ok(PipelineOutcome::Published(PublishReport {
            collection_id: collection.id,
            tracks,
            sub_collections,
            states: std::mem::take(&mut run.states),
        }))
    }

    async fn tracks_branch(
        &self,
        collection: &Collection,
        current: Option<&AssetRef>,
    ) -> Result<TracksBranchReport, PipelineError> {
        let selection =
            FeatureSelector::new().select_tracks(&collection.tracks, &mut rand::thread_rng());
        let bounds = bounding_box(&selection.coordinates)?;
        let geo_json = FeatureCollection::new(selection.features);

        self.content
            .update_collection(&collection.id, &geo_json, &bounds)
            .await
            .map_err(content_error("update_collection"))?;

        let cache = CacheSynchronizer::new(self.features, self.cache)
            .sync(&collection.name, &bounds)
            .await?;

        let outline = FeatureCollection::new(vec![boundary_feature(&bounds)]);
        let asset = AssetLifecycleManager::new(self.content, self.renderer)
            .refresh(AssetRequest {
                collection_id: &collection.id,
                name: &collection.name,
                current,
                bounds: &bounds,
                features: &outline,
            })
            .await?;

        Ok(TracksBranchReport {
            bounds,
            features: geo_json.len(),
            skipped_tracks: selection.skipped,
            cache,
            asset,
        })
    }

    async fn sub_collections_branch(
        &self,
        collection: &Collection,
        current: Option<&AssetRef>,
    ) -> Result<SubCollectionsBranchReport, PipelineError> {
        let (features, corners) = sub_collection_features(&collection.sub_collections);
        let bounds = bounding_box(&corners)?;
        let geo_json = FeatureCollection::new(features);

        self.content
            .update_collection(&collection.id, &geo_json, &bounds)
            .await
            .map_err(content_error("update_collection"))?;

        let asset = AssetLifecycleManager::new(self.content, self.renderer)
            .refresh(AssetRequest {
                collection_id: &collection.id,
                name: &collection.name,
                current,
                bounds: &bounds,
                features: &geo_json,
            })
            .await?;

        Ok(SubCollectionsBranchReport {
            bounds,
            features: geo_json.len(),
            asset,
        })
    }
}
