//! Pipeline error types.

use std::fmt;
use thiserror::Error;

use crate::cache::FeatureCategory;
use crate::client::{ClientError, Collaborator};
use crate::geo::GeoError;

/// Errors that abort a pipeline invocation.
///
/// Every variant is fatal to the current attempt. The caller decides
/// whether to redeliver; the pipeline is safe to re-run from scratch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A remote call to one collaborator failed
    #[error("{collaborator} call {operation} failed: {source}")]
    Remote {
        collaborator: Collaborator,
        operation: &'static str,
        source: ClientError,
    },

    /// One or more cache categories failed after all were attempted
    #[error("cache synchronization failed: {}", join_failures(.failures))]
    CacheSync { failures: Vec<CategoryFailure> },

    /// Bounding box over an empty or invalid coordinate set
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl PipelineError {
    pub fn remote(collaborator: Collaborator, operation: &'static str, source: ClientError) -> Self {
        Self::Remote {
            collaborator,
            operation,
            source,
        }
    }

    /// The collaborator a remote failure came from.
    pub fn collaborator(&self) -> Option<Collaborator> {
        match self {
            Self::Remote { collaborator, .. } => Some(*collaborator),
            _ => None,
        }
    }
}

/// One category that could not be synchronized.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFailure {
    pub category: FeatureCategory,
    pub collaborator: Collaborator,
    pub error: ClientError,
}

impl fmt::Display for CategoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.category, self.collaborator, self.error)
    }
}

fn join_failures(failures: &[CategoryFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
