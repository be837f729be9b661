//! Cache keys, documents and the fixed feature category set.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::feature::FeatureCollection;
use crate::geo::BoundingBox;

/// Record type stored in every collection cache key.
pub const COLLECTION_RECORD_TYPE: &str = "Collection";

/// Content kind used to partition cached search documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureCategory {
    Image,
    Pass,
    Residence,
    Map,
    Book,
    Track,
    Segment,
}

impl FeatureCategory {
    /// Every category, in synchronization order.
    pub const ALL: [FeatureCategory; 7] = [
        FeatureCategory::Image,
        FeatureCategory::Pass,
        FeatureCategory::Residence,
        FeatureCategory::Map,
        FeatureCategory::Book,
        FeatureCategory::Track,
        FeatureCategory::Segment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureCategory::Image => "image",
            FeatureCategory::Pass => "pass",
            FeatureCategory::Residence => "residence",
            FeatureCategory::Map => "map",
            FeatureCategory::Book => "book",
            FeatureCategory::Track => "track",
            FeatureCategory::Segment => "segment",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category name outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for FeatureCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Upsert key of a cache entry. At most one entry exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: String,
    pub record_type: String,
    pub category: FeatureCategory,
}

impl CacheKey {
    /// Key for a collection's entry in `category`.
    pub fn collection(name: impl Into<String>, category: FeatureCategory) -> Self {
        Self {
            name: name.into(),
            record_type: COLLECTION_RECORD_TYPE.to_string(),
            category,
        }
    }

    /// Stable object id derived from the whole key.
    pub fn object_id(&self) -> String {
        format!("{}:{}:{}", self.record_type, self.category, self.name)
    }
}

/// Cached value: merged representative features and the query extent.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheDocument {
    pub geo_json: FeatureCollection,
    pub bounds: BoundingBox,
}
