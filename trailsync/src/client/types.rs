//! Collaborator error types.

use std::fmt;
use thiserror::Error;

/// Errors returned by any external collaborator call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Transport failure or non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// GraphQL endpoint answered with an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client could not be constructed from configuration
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// The external system a remote call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    ContentRepository,
    RenderingService,
    FeatureStore,
    CacheStore,
    SearchIndex,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::ContentRepository => "content repository",
            Collaborator::RenderingService => "rendering service",
            Collaborator::FeatureStore => "feature store",
            Collaborator::CacheStore => "cache store",
            Collaborator::SearchIndex => "search index",
        };
        f.write_str(name)
    }
}
