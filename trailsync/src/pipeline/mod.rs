//! Collection publish pipeline: authorization, branching and sequencing
//! of the aggregation, cache and asset components.

mod error;
mod event;
mod orchestrator;

pub use error::{CategoryFailure, PipelineError};
pub use event::{authorize, EventError, PublishEvent, SkipReason};
pub use orchestrator::{
    CollectionPipeline, PipelineOutcome, PipelineState, PublishReport, SubCollectionsBranchReport,
    TracksBranchReport,
};
