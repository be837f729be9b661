//! Preview image lifecycle for a collection.
//!
//! Each refresh renders a new map image, imports it into the asset store,
//! labels and publishes it, and only then attaches it to the collection.
//! The collection therefore never references a half-finished asset.
//!
//! The previously attached asset is deleted first. That delete is best
//! effort: its failure is reported in [`AssetReport::stale`] and the
//! refresh carries on. Every later step failure aborts the refresh.

use std::fmt;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::client::{ClientError, Collaborator, ContentRepository, MapRenderer};
use crate::feature::FeatureCollection;
use crate::geo::BoundingBox;
use crate::model::AssetRef;
use crate::pipeline::PipelineError;

/// Steps of an asset refresh, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStep {
    DeleteStale,
    Render,
    Upload,
    Rename,
    Publish,
    Attach,
}

impl AssetStep {
    pub const ORDER: [AssetStep; 6] = [
        AssetStep::DeleteStale,
        AssetStep::Render,
        AssetStep::Upload,
        AssetStep::Rename,
        AssetStep::Publish,
        AssetStep::Attach,
    ];

    /// Name of the remote operation behind this step.
    pub fn operation(&self) -> &'static str {
        match self {
            AssetStep::DeleteStale => "delete_asset",
            AssetStep::Render => "render_map",
            AssetStep::Upload => "upload_asset",
            AssetStep::Rename => "rename_asset",
            AssetStep::Publish => "publish_asset",
            AssetStep::Attach => "connect_asset",
        }
    }

    pub fn collaborator(&self) -> Collaborator {
        match self {
            AssetStep::Render => Collaborator::RenderingService,
            _ => Collaborator::ContentRepository,
        }
    }
}

impl fmt::Display for AssetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

/// Outcome of removing the previously attached asset.
#[derive(Debug, Clone, PartialEq)]
pub enum StaleCleanup {
    /// The collection had no preview asset
    NotPresent,
    Deleted(AssetRef),
    /// Deletion failed; the asset may be orphaned
    Failed { asset: AssetRef, error: ClientError },
}

/// Result of a completed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetReport {
    /// The new asset, now attached to the collection
    pub asset: AssetRef,
    pub image_url: String,
    pub stale: StaleCleanup,
}

/// Inputs of one refresh.
#[derive(Debug, Clone, Copy)]
pub struct AssetRequest<'r> {
    pub collection_id: &'r str,
    /// Label given to the new asset
    pub name: &'r str,
    /// Asset currently attached to the collection
    pub current: Option<&'r AssetRef>,
    pub bounds: &'r BoundingBox,
    pub features: &'r FeatureCollection,
}

/// Produces and attaches exactly one live preview asset per refresh.
pub struct AssetLifecycleManager<'a, R, M> {
    content: &'a R,
    renderer: &'a M,
}

impl<'a, R: ContentRepository, M: MapRenderer> AssetLifecycleManager<'a, R, M> {
    pub fn new(content: &'a R, renderer: &'a M) -> Self {
        Self { content, renderer }
    }

    /// Runs every step of [`AssetStep::ORDER`], each awaited before the next.
    pub async fn refresh(&self, request: AssetRequest<'_>) -> Result<AssetReport, PipelineError> {
        let stale = match request.current {
            Some(asset) => self.delete_stale(asset).await,
            None => StaleCleanup::NotPresent,
        };

        let image_url = self
            .run_step(
                AssetStep::Render,
                self.renderer.render_map(request.bounds, request.features),
            )
            .await?;
        let asset = self
            .run_step(AssetStep::Upload, self.content.upload_asset(&image_url))
            .await?;
        self.run_step(
            AssetStep::Rename,
            self.content.rename_asset(&asset.id, request.name),
        )
        .await?;
        self.run_step(AssetStep::Publish, self.content.publish_asset(&asset.id))
            .await?;
        self.run_step(
            AssetStep::Attach,
            self.content.connect_asset(request.collection_id, &asset.id),
        )
        .await?;

        info!(
            collection = request.collection_id,
            asset = %asset.id,
            "Preview asset attached"
        );
        Ok(AssetReport {
            asset,
            image_url,
            stale,
        })
    }

    async fn delete_stale(&self, asset: &AssetRef) -> StaleCleanup {
        debug!(step = %AssetStep::DeleteStale, asset = %asset.id, "Asset step");
        match self.content.delete_asset(&asset.id).await {
            Ok(()) => StaleCleanup::Deleted(asset.clone()),
            Err(error) => {
                warn!(asset = %asset.id, error = %error, "Failed to delete stale preview asset");
                StaleCleanup::Failed {
                    asset: asset.clone(),
                    error,
                }
            }
        }
    }

    async fn run_step<T>(
        &self,
        step: AssetStep,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, PipelineError> {
        debug!(step = %step, "Asset step");
        call.await.map_err(|error| {
            warn!(step = %step, error = %error, "Asset step failed");
            PipelineError::remote(step.collaborator(), step.operation(), error)
        })
    }
}
