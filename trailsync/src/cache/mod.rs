//! Search-cache entries derived from the feature store.

mod sync;
mod types;

pub use sync::{CacheSyncReport, CacheSynchronizer};
pub use types::{
    CacheDocument, CacheKey, FeatureCategory, UnknownCategory, COLLECTION_RECORD_TYPE,
};
