//! Place search. The lookup itself is an external, asynchronous service; the core only turns
//! its resolved hits into points.

pub mod nominatim;

use crate::Result;
use crate::point::Point;
use crate::view::Bounds;
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

impl GeocodeHit {
    /// Canonical point with the display name as comment, or `default_comment` when the name is
    /// blank.
    pub fn to_point(&self, default_comment: &str) -> Point {
        Point::with_default_comment(self.lat, self.lng, &self.display_name, default_comment)
    }
}

pub trait Geocoder {
    /// Searches for `query` restricted to `bounds`.
    fn search(&self, query: &str, bounds: &Bounds)
    -> impl Future<Output = Result<Vec<GeocodeHit>>>;
}
