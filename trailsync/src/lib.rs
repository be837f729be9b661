//! trailsync - collection geometry aggregation and search-cache
//! synchronization for published trail collections.
//!
//! When a collection is published in the content repository, the pipeline
//! merges its tracks (or sub-collections) into a bounding box and a set of
//! representative features, stores them on the collection, rebuilds the
//! per-category search cache from the geo-queryable feature store, and
//! replaces the collection's rendered preview image.
//!
//! # High-Level API
//!
//! ```ignore
//! use trailsync::client::ServiceClients;
//! use trailsync::config::ConfigFile;
//! use trailsync::pipeline::{CollectionPipeline, PublishEvent};
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env(|name| std::env::var(name).ok());
//! let clients = ServiceClients::from_config(&config)?;
//!
//! let pipeline = CollectionPipeline::new(
//!     &clients.content,
//!     &clients.renderer,
//!     &clients.features,
//!     &clients.search,
//! );
//! let outcome = pipeline.handle(&PublishEvent::from_webhook(body)?).await?;
//! ```

pub mod asset;
pub mod boundary;
pub mod cache;
pub mod category;
pub mod client;
pub mod config;
pub mod feature;
pub mod geo;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod search;

/// Version of the trailsync library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
