//! Flat lat/lon geometry helpers.
//!
//! Only axis-aligned bounding boxes are supported; there is no projection
//! math and no polygon clipping.

mod types;

pub use types::{BoundingBox, Coordinate, GeoError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Reduces a set of coordinates to the tightest enclosing bounding box.
///
/// # Errors
///
/// Returns [`GeoError::EmptyInput`] when `coords` yields nothing, and
/// [`GeoError::InvalidLatitude`] / [`GeoError::InvalidLongitude`] for the
/// first coordinate outside the valid range.
pub fn bounding_box<'a, I>(coords: I) -> Result<BoundingBox, GeoError>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut iter = coords.into_iter();
    let first = *iter.next().ok_or(GeoError::EmptyInput)?;
    first.validate()?;

    iter.try_fold(
        BoundingBox {
            min: first,
            max: first,
        },
        |mut bounds, point| {
            point.validate()?;
            bounds.min.latitude = bounds.min.latitude.min(point.latitude);
            bounds.min.longitude = bounds.min.longitude.min(point.longitude);
            bounds.max.latitude = bounds.max.latitude.max(point.latitude);
            bounds.max.longitude = bounds.max.longitude.max(point.longitude);
            Ok(bounds)
        },
    )
}
