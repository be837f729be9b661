//! Faceted search categories.
//!
//! Produces `facet path -> ordered values` maps that are merged into the
//! search document a caller upserts. Each derivation is emitted only when
//! its inputs are complete.

use std::collections::BTreeMap;

use crate::model::{CollectionMembership, TrackLocation};

/// Facet path to ordered list of values.
pub type Facets = BTreeMap<String, Vec<String>>;

pub const LOCATION_LEVELS: [&str; 3] = [
    "hierarchicalCategories.lvl0",
    "hierarchicalCategories.lvl1",
    "hierarchicalCategories.lvl2",
];

pub const COLLECTION_LEVELS: [&str; 2] = ["collections.lvl0", "collections.lvl1"];

const SEPARATOR: &str = " > ";

/// Country > state > city facets for both ends of a track.
///
/// Returns an empty map unless all six location fields are present and
/// non-empty.
pub fn location_hierarchy(location: &TrackLocation) -> Facets {
    let fields = [
        &location.start_country,
        &location.start_state,
        &location.start_city,
        &location.end_country,
        &location.end_state,
        &location.end_city,
    ];
    let present: Vec<&str> = fields
        .iter()
        .filter_map(|field| field.as_deref().filter(|v| !v.is_empty()))
        .collect();
    let &[start_country, start_state, start_city, end_country, end_state, end_city] =
        present.as_slice()
    else {
        return Facets::new();
    };

    let start = [start_country, start_state, start_city];
    let end = [end_country, end_state, end_city];

    LOCATION_LEVELS
        .iter()
        .enumerate()
        .map(|(depth, level)| {
            let values = vec![start[..=depth].join(SEPARATOR), end[..=depth].join(SEPARATOR)];
            (level.to_string(), values)
        })
        .collect()
}

/// Category type > collection facets.
///
/// Walks each membership and one level of nested sub-collections, parent
/// before children. Returns an empty map when there are no memberships.
pub fn collection_hierarchy(memberships: &[CollectionMembership]) -> Facets {
    if memberships.is_empty() {
        return Facets::new();
    }

    let mut lvl0 = Vec::new();
    let mut lvl1 = Vec::new();
    for membership in memberships {
        for entry in std::iter::once(membership).chain(membership.sub_collections.iter()) {
            let type_name = &entry.category_type.name;
            lvl0.push(type_name.clone());
            lvl1.push(format!("{}{}{}", type_name, SEPARATOR, entry.name));
        }
    }

    Facets::from([
        (COLLECTION_LEVELS[0].to_string(), lvl0),
        (COLLECTION_LEVELS[1].to_string(), lvl1),
    ])
}

/// Both derivations merged into one map.
pub fn derive_facets(location: &TrackLocation, memberships: &[CollectionMembership]) -> Facets {
    let mut facets = location_hierarchy(location);
    facets.extend(collection_hierarchy(memberships));
    facets
}
