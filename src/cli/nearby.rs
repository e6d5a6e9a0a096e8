//! Nearby command handler
//!
//! Resolves a search center, queries nearby places and prints them.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::{get_geocoder, get_ip_locator, GeoBackend, GeoPoint};
use crate::nearby::overpass::OverpassBackend;
use crate::nearby::{available_categories, Category, NearbyResolver};
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Place type: hospitals or diplomatic
    #[arg(required_unless_present = "list_formats")]
    pub category: Option<String>,

    /// Latitude
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Named location (geocoded)
    #[arg(long, conflicts_with_all = ["lat", "lon", "here"])]
    pub location: Option<String>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lon", "location"])]
    pub here: bool,

    /// Search radius in meters (clamped to 500-50000)
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    super::init_logging("warn");
    let config = Config::load()?;

    let category = args.category.as_deref().unwrap_or_default();
    let formatter_name = args.format.unwrap_or_else(|| config.output.format.clone());
    let formatter = get_formatter(&formatter_name)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", formatter_name)))?;

    // Reject unknown categories before any location lookup
    if let Err(e) = category.parse::<Category>() {
        eprintln!("Available types:");
        for c in available_categories() {
            eprintln!("  {}", c);
        }
        return Err(e);
    }

    let center = if args.here {
        let location = get_ip_locator().locate().await?;
        eprintln!("Using IP location: {}", location.display_name);
        location.point
    } else if let Some(query) = &args.location {
        match get_geocoder()?.geocode(query).await? {
            Some(location) => {
                eprintln!("Geocoded to: {}", location.display_name);
                location.point
            }
            None => {
                return Err(Error::Geocoding(format!("Could not geocode '{}'", query)));
            }
        }
    } else if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        GeoPoint::new(lat, lon)
    } else {
        return Err(Error::InvalidCoordinates(
            "No location specified. Use --lat/--lon, --location, or --here".to_string(),
        ));
    };

    let backend = OverpassBackend::new(&config.nearby.overpass_url)?;
    let resolver = NearbyResolver::with_settings(backend, config.nearby.resolver_settings());
    let result = resolver.find_nearby(category, center, args.radius).await?;

    let output = formatter.format(&result)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
