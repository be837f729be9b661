//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors produced by the geometry helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A bounding box was requested over zero coordinates
    #[error("cannot compute a bounding box over an empty coordinate set")]
    EmptyInput,

    /// Latitude outside [-90, 90]
    #[error("invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180]
    #[error("invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A geographic position in decimal degrees.
///
/// Serialized the way the content repository stores locations
/// (`{ "latitude": .., "longitude": .. }`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks both components against the valid ranges. NaN is rejected.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// GeoJSON position order: `[longitude, latitude]`.
    #[inline]
    pub fn position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Minimal axis-aligned lat/lon rectangle.
///
/// Invariant: `min.latitude <= max.latitude` and
/// `min.longitude <= max.longitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl BoundingBox {
    /// Builds a box from two stored corners, normalising their order.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate {
                latitude: a.latitude.min(b.latitude),
                longitude: a.longitude.min(b.longitude),
            },
            max: Coordinate {
                latitude: a.latitude.max(b.latitude),
                longitude: a.longitude.max(b.longitude),
            },
        }
    }

    /// Returns true if the point lies inside or on the edge of the box.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min.latitude..=self.max.latitude).contains(&point.latitude)
            && (self.min.longitude..=self.max.longitude).contains(&point.longitude)
    }

    /// The closed five-point ring `SW, SE, NE, NW, SW` in GeoJSON order.
    pub fn ring(&self) -> [[f64; 2]; 5] {
        let (min_lon, min_lat) = (self.min.longitude, self.min.latitude);
        let (max_lon, max_lat) = (self.max.longitude, self.max.latitude);
        [
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
            [min_lon, min_lat],
        ]
    }

    /// The four corners as coordinates (SW, SE, NW, NE).
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            self.min,
            Coordinate {
                latitude: self.min.latitude,
                longitude: self.max.longitude,
            },
            Coordinate {
                latitude: self.max.latitude,
                longitude: self.min.longitude,
            },
            self.max,
        ]
    }
}
