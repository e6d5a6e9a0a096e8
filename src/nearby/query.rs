//! Overpass QL query generation
//!
//! Every selector is matched against nodes, ways and relations within the
//! radius; `out center tags` gives ways and relations a centroid.

use crate::constants::nearby::OVERPASS_QUERY_TIMEOUT_SECS;
use crate::geo::GeoPoint;
use crate::nearby::Category;

const ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Tag filters (key, value) for a category
pub fn tag_filters(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Hospitals => &[("amenity", "hospital")],
        Category::Diplomatic => &[("amenity", "embassy"), ("office", "diplomatic")],
    }
}

/// Build the Overpass query for a category around a point
pub fn build_overpass_query(category: Category, point: GeoPoint, radius_meters: u32) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", OVERPASS_QUERY_TIMEOUT_SECS);

    for (key, value) in tag_filters(category) {
        for kind in ELEMENT_KINDS {
            query.push_str(&format!(
                "  {}(around:{},{},{})[\"{}\"=\"{}\"];\n",
                kind, radius_meters, point.lat, point.lon, key, value
            ));
        }
    }

    query.push_str(");\nout center tags;");
    query
}
