//! Upstream element cleanup
//!
//! Field rules, applied per element:
//! - location: own `lat`/`lon`, else `center`; dropped when not finite
//! - name: `name` tag, else the category label
//! - address: non-empty of house number, street, city/town/village, postcode joined by ", "
//! - phone: `phone`, else `contact:phone`, passed through verbatim
//! - website: `website`, else `contact:website`, kept only for http/https URLs

use crate::geo::distance::distance_meters;
use crate::geo::GeoPoint;
use crate::nearby::overpass::OverpassElement;
use crate::nearby::{Category, PlaceRecord};
use std::collections::HashMap;
use url::Url;

/// An element that passed sanitization but has no distance yet
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedPlace {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl SanitizedPlace {
    /// Finalize into a record measured from `origin`
    pub fn into_record(self, origin: GeoPoint) -> PlaceRecord {
        PlaceRecord {
            distance_meters: distance_meters(origin, self.location),
            id: self.id,
            name: self.name,
            location: self.location,
            address: self.address,
            phone: self.phone,
            website: self.website,
        }
    }
}

/// Clean one upstream element, or `None` if it has no usable location
pub fn sanitize_element(element: &OverpassElement, category: Category) -> Option<SanitizedPlace> {
    let location = resolve_location(element)?;
    let tags = &element.tags;

    Some(SanitizedPlace {
        id: format!("{}/{}", element.kind, element.id),
        name: tag(tags, "name")
            .unwrap_or(category.default_label())
            .to_string(),
        location,
        address: resolve_address(tags),
        phone: first_tag(tags, &["phone", "contact:phone"]).map(str::to_string),
        website: first_tag(tags, &["website", "contact:website"]).and_then(safe_http_url),
    })
}

/// Keep `raw` only if it parses as an http or https URL
pub fn safe_http_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" => Some(raw.to_string()),
        _ => None,
    }
}

fn resolve_location(element: &OverpassElement) -> Option<GeoPoint> {
    let center = element.center.as_ref();
    let lat = element.lat.or(center.map(|c| c.lat))?;
    let lon = element.lon.or(center.map(|c| c.lon))?;

    if lat.is_finite() && lon.is_finite() {
        Some(GeoPoint::new(lat, lon))
    } else {
        None
    }
}

fn resolve_address(tags: &HashMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = [
        tag(tags, "addr:housenumber"),
        tag(tags, "addr:street"),
        first_tag(tags, &["addr:city", "addr:town", "addr:village"]),
        tag(tags, "addr:postcode"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Tag value, treating empty strings as absent
fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn first_tag<'a>(tags: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| tag(tags, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nearby::overpass::Center;

    fn element(kind: &str, lat: Option<f64>, lon: Option<f64>, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement {
            kind: kind.to_string(),
            id: 42,
            lat,
            lon,
            center: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_node_location_and_id() {
        let el = element("node", Some(51.5), Some(-0.12), &[("name", "St Thomas'")]);
        let place = sanitize_element(&el, Category::Hospitals).unwrap();

        assert_eq!(place.id, "node/42");
        assert_eq!(place.name, "St Thomas'");
        assert_eq!(place.location, GeoPoint::new(51.5, -0.12));
    }

    #[test]
    fn test_way_uses_center() {
        let mut el = element("way", None, None, &[]);
        el.center = Some(Center { lat: 48.85, lon: 2.35 });

        let place = sanitize_element(&el, Category::Hospitals).unwrap();
        assert_eq!(place.id, "way/42");
        assert_eq!(place.location, GeoPoint::new(48.85, 2.35));
    }

    #[test]
    fn test_missing_location_is_dropped() {
        let el = element("relation", None, None, &[("name", "Nowhere")]);
        assert!(sanitize_element(&el, Category::Diplomatic).is_none());

        let el = element("node", Some(f64::NAN), Some(1.0), &[]);
        assert!(sanitize_element(&el, Category::Diplomatic).is_none());
    }

    #[test]
    fn test_default_names() {
        let el = element("node", Some(1.0), Some(1.0), &[]);
        assert_eq!(sanitize_element(&el, Category::Hospitals).unwrap().name, "Hospital");
        assert_eq!(
            sanitize_element(&el, Category::Diplomatic).unwrap().name,
            "Embassy / Consulate"
        );

        let el = element("node", Some(1.0), Some(1.0), &[("name", "")]);
        assert_eq!(sanitize_element(&el, Category::Hospitals).unwrap().name, "Hospital");
    }

    #[test]
    fn test_address_joining() {
        let el = element(
            "node",
            Some(1.0),
            Some(1.0),
            &[
                ("addr:housenumber", "16"),
                ("addr:street", "Rue de la Loi"),
                ("addr:town", "Bruxelles"),
                ("addr:postcode", "1000"),
            ],
        );
        let place = sanitize_element(&el, Category::Diplomatic).unwrap();
        assert_eq!(place.address.as_deref(), Some("16, Rue de la Loi, Bruxelles, 1000"));

        let el = element("node", Some(1.0), Some(1.0), &[("addr:street", "Main St"), ("addr:postcode", "")]);
        let place = sanitize_element(&el, Category::Diplomatic).unwrap();
        assert_eq!(place.address.as_deref(), Some("Main St"));

        let el = element("node", Some(1.0), Some(1.0), &[]);
        assert!(sanitize_element(&el, Category::Diplomatic).unwrap().address.is_none());
    }

    #[test]
    fn test_city_precedence() {
        let el = element(
            "node",
            Some(1.0),
            Some(1.0),
            &[("addr:village", "Smallville"), ("addr:city", "Metropolis")],
        );
        let place = sanitize_element(&el, Category::Hospitals).unwrap();
        assert_eq!(place.address.as_deref(), Some("Metropolis"));
    }

    #[test]
    fn test_phone_passthrough_and_fallback() {
        let el = element("node", Some(1.0), Some(1.0), &[("phone", "+44 (0)20 7188 7188; ext 2")]);
        let place = sanitize_element(&el, Category::Hospitals).unwrap();
        assert_eq!(place.phone.as_deref(), Some("+44 (0)20 7188 7188; ext 2"));

        let el = element("node", Some(1.0), Some(1.0), &[("contact:phone", "112")]);
        let place = sanitize_element(&el, Category::Hospitals).unwrap();
        assert_eq!(place.phone.as_deref(), Some("112"));
    }

    #[test]
    fn test_website_filtering() {
        let cases = [
            ("https://x.example", Some("https://x.example")),
            ("http://embassy.example/contact?lang=en", Some("http://embassy.example/contact?lang=en")),
            ("javascript:alert(1)", None),
            ("ftp://files.example", None),
            ("not a url", None),
            ("www.example.com", None),
        ];

        for (raw, expected) in cases {
            let el = element("node", Some(1.0), Some(1.0), &[("website", raw)]);
            let place = sanitize_element(&el, Category::Diplomatic).unwrap();
            assert_eq!(place.website.as_deref(), expected, "website {:?}", raw);
        }
    }

    #[test]
    fn test_contact_website_fallback() {
        let el = element("node", Some(1.0), Some(1.0), &[("contact:website", "https://fallback.example")]);
        let place = sanitize_element(&el, Category::Diplomatic).unwrap();
        assert_eq!(place.website.as_deref(), Some("https://fallback.example"));
    }

    #[test]
    fn test_into_record_measures_distance() {
        let el = element("node", Some(0.0), Some(0.0), &[]);
        let origin = GeoPoint::new(1.0, 0.0);
        let record = sanitize_element(&el, Category::Hospitals)
            .unwrap()
            .into_record(origin);

        assert_eq!(record.distance_meters, 111_195);
        assert_eq!(record.location, GeoPoint::new(0.0, 0.0));
    }
}
