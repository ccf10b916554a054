use super::GeocodeHit;
use crate::codec::parse_coordinate;
use crate::view::Bounds;
use crate::{Error, Result};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    fn value(&self) -> Option<f64> {
        match self {
            Number::Float(v) => v.is_finite().then_some(*v),
            Number::Text(s) => parse_coordinate(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Number,
    lon: Number,
    #[serde(default)]
    display_name: String,
}

/// Search request for a Nominatim-compatible endpoint, bounded to the visible view.
pub fn search_url(endpoint: &str, query: &str, bounds: &Bounds) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|err| Error::Geocode {
        message: format!("invalid endpoint '{endpoint}': {err}"),
    })?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("q", query)
        .append_pair("viewbox", &bounds.viewbox())
        .append_pair("bounded", "1");
    Ok(url)
}

/// Reads a Nominatim JSON result array. Places without usable coordinates are dropped.
pub fn parse_results(json: &str) -> Result<Vec<GeocodeHit>> {
    let places: Vec<Place> = serde_json::from_str(json)?;
    Ok(places
        .into_iter()
        .filter_map(|place| {
            let (Some(lat), Some(lng)) = (place.lat.value(), place.lon.value()) else {
                tracing::debug!(name = %place.display_name, "dropping place without coordinates");
                return None;
            };
            Some(GeocodeHit {
                lat,
                lng,
                display_name: place.display_name,
            })
        })
        .collect())
}
