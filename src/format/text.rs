//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::nearby::{Category, NearbyResult};

/// Text formatter - outputs a numbered list of places
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, result: &NearbyResult) -> Result<String> {
        let mut output = format!(
            "Nearby {} within {} of ({:.6}, {:.6})\n\n",
            noun(result.category),
            format_distance(result.radius),
            result.lat,
            result.lon
        );

        if result.items.is_empty() {
            output.push_str(&format!("No {} found nearby.\n", noun(result.category)));
            return Ok(output);
        }

        for (i, place) in result.items.iter().enumerate() {
            output.push_str(&format!(
                "{:2}. {} ({})\n",
                i + 1,
                place.name,
                format_distance(place.distance_meters)
            ));
            if let Some(address) = &place.address {
                output.push_str(&format!("    {}\n", address));
            }
            if let Some(phone) = &place.phone {
                output.push_str(&format!("    Phone: {}\n", phone));
            }
            if let Some(website) = &place.website {
                output.push_str(&format!("    Web: {}\n", website));
            }
        }

        Ok(output)
    }
}

fn noun(category: Category) -> &'static str {
    match category {
        Category::Hospitals => "hospitals",
        Category::Diplomatic => "embassies and consulates",
    }
}

/// "850 m" below a kilometer, "1.2 km" above
fn format_distance(meters: u32) -> String {
    if meters < 1000 {
        format!("{} m", meters)
    } else {
        format!("{:.1} km", meters as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::nearby::PlaceRecord;

    fn result_with(items: Vec<PlaceRecord>) -> NearbyResult {
        NearbyResult {
            category: Category::Hospitals,
            lat: 51.5074,
            lon: -0.1278,
            radius: 10_000,
            items,
        }
    }

    #[test]
    fn test_text_format() {
        let place = PlaceRecord {
            id: "way/1".to_string(),
            name: "St Thomas' Hospital".to_string(),
            location: GeoPoint::new(51.4989, -0.1186),
            distance_meters: 1180,
            address: Some("Westminster Bridge Road, London".to_string()),
            phone: Some("+44 20 7188 7188".to_string()),
            website: None,
        };

        let output = TextFormatter.format(&result_with(vec![place])).unwrap();

        assert!(output.starts_with("Nearby hospitals within 10.0 km of (51.507400, -0.127800)"));
        assert!(output.contains(" 1. St Thomas' Hospital (1.2 km)"));
        assert!(output.contains("Westminster Bridge Road, London"));
        assert!(output.contains("Phone: +44 20 7188 7188"));
        assert!(!output.contains("Web:"));
    }

    #[test]
    fn test_empty_result() {
        let output = TextFormatter.format(&result_with(Vec::new())).unwrap();
        assert!(output.contains("No hospitals found nearby."));
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(850), "850 m");
        assert_eq!(format_distance(1000), "1.0 km");
        assert_eq!(format_distance(12_345), "12.3 km");
    }
}
