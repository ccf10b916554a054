use crate::codec::format_coordinate;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// A lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest rectangle containing every point; `None` when there are no points.
    pub fn of(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut out = Self::new(first.lat, first.lng, first.lat, first.lng);
        for p in rest {
            out.south = out.south.min(p.lat);
            out.north = out.north.max(p.lat);
            out.west = out.west.min(p.lng);
            out.east = out.east.max(p.lng);
        }
        Some(out)
    }

    pub fn contains(&self, point: &Point) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }

    /// `west,north,east,south`, the order geocoders expect for a `viewbox` parameter.
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            format_coordinate(self.west),
            format_coordinate(self.north),
            format_coordinate(self.east),
            format_coordinate(self.south)
        )
    }
}

/// The map widget that shows the markers. Rendering itself happens elsewhere.
pub trait MarkerView {
    type Handle;

    fn place_point(&mut self, point: &Point) -> Self::Handle;

    fn remove_point(&mut self, handle: Self::Handle);

    fn fit_bounds(&mut self, bounds: Bounds);
}
