//! Rectangular boundary features drawn on preview maps.

use serde_json::json;

use crate::feature::{Geometry, GeometryFeature, Properties};
use crate::geo::{BoundingBox, Coordinate};
use crate::model::SubCollection;

pub const BOUNDARY_STROKE: &str = "#ff3300";
pub const BOUNDARY_STROKE_WIDTH: u32 = 2;
pub const BOUNDARY_FILL_OPACITY: u32 = 0;

fn styling() -> Properties {
    let mut properties = Properties::new();
    properties.insert("stroke".into(), json!(BOUNDARY_STROKE));
    properties.insert("stroke-width".into(), json!(BOUNDARY_STROKE_WIDTH));
    properties.insert("fill-opacity".into(), json!(BOUNDARY_FILL_OPACITY));
    properties
}

/// Unlabelled outline of a whole-collection bounding box.
pub fn boundary_feature(bounds: &BoundingBox) -> GeometryFeature {
    GeometryFeature::new(Geometry::bounding_polygon(bounds), styling())
}

/// Labelled outline of one sub-collection.
pub fn sub_collection_feature(sub_collection: &SubCollection) -> GeometryFeature {
    let mut feature = boundary_feature(&sub_collection.bounding_box())
        .with_property("name", sub_collection.name.as_str())
        .with_property("color", BOUNDARY_STROKE);
    if let Some(slug) = &sub_collection.category_type.slug {
        feature = feature.with_property("type", slug.as_str());
    }
    feature
}

/// One outline per sub-collection plus the corners feeding the aggregate box.
pub fn sub_collection_features(
    sub_collections: &[SubCollection],
) -> (Vec<GeometryFeature>, Vec<Coordinate>) {
    let features = sub_collections.iter().map(sub_collection_feature).collect();
    let corners = sub_collections
        .iter()
        .flat_map(|sub| {
            let bounds = sub.bounding_box();
            [bounds.min, bounds.max]
        })
        .collect();
    (features, corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryType;

    fn north_shore() -> SubCollection {
        SubCollection {
            name: "North Shore".into(),
            min_coords: Coordinate {
                latitude: 39.2,
                longitude: -120.2,
            },
            max_coords: Coordinate {
                latitude: 39.3,
                longitude: -119.9,
            },
            category_type: CategoryType {
                name: "Area".into(),
                slug: Some("area".into()),
            },
        }
    }

    #[test]
    fn test_sub_collection_feature_geometry_and_style() {
        let feature = sub_collection_feature(&north_shore());
        let geometry = feature.geometry.as_ref().unwrap();
        assert_eq!(geometry.kind, "Polygon");
        assert_eq!(
            geometry.coordinates,
            json!([[
                [-120.2, 39.2],
                [-119.9, 39.2],
                [-119.9, 39.3],
                [-120.2, 39.3],
                [-120.2, 39.2]
            ]])
        );
        assert_eq!(feature.properties["name"], "North Shore");
        assert_eq!(feature.properties["type"], "area");
        assert_eq!(feature.properties["color"], "#ff3300");
        assert_eq!(feature.properties["stroke"], "#ff3300");
        assert_eq!(feature.properties["stroke-width"], 2);
        assert_eq!(feature.properties["fill-opacity"], 0);
    }

    #[test]
    fn test_sub_collection_feature_is_deterministic() {
        assert_eq!(
            sub_collection_feature(&north_shore()),
            sub_collection_feature(&north_shore())
        );
    }

    #[test]
    fn test_collection_boundary_has_no_label() {
        let feature = boundary_feature(&north_shore().bounding_box());
        assert!(!feature.properties.contains_key("name"));
        assert_eq!(feature.properties.len(), 3);
    }

    #[test]
    fn test_sub_collection_features_collect_corners() {
        let (features, corners) = sub_collection_features(&[north_shore(), north_shore()]);
        assert_eq!(features.len(), 2);
        assert_eq!(corners.len(), 4);
    }
}
