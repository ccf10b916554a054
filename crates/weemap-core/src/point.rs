use crate::sanitize::sanitize_comment;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Placeholder comment for markers placed without one.
pub const DEFAULT_COMMENT: &str = "wee";

/// Rounds a coordinate to 6 decimal digits (half away from zero).
///
/// This is the canonical form used for storage, comparison and display. Non-finite input
/// yields `NaN` so callers can reject the record.
pub fn normalize(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    let scaled = x * 1e6;
    if !scaled.is_finite() {
        return x;
    }
    let v = scaled.round() / 1e6;
    if v == -0.0 { 0.0 } else { v }
}

/// A stored marker: latitude, longitude and a free-text comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
    pub comment: String,
}

pub type PointCollection = Vec<Point>;

impl Point {
    /// Builds a point in canonical form: normalized coordinates, sanitized comment and the
    /// default placeholder for an empty comment.
    pub fn new(lat: f64, lng: f64, comment: impl AsRef<str>) -> Self {
        Self::with_default_comment(lat, lng, comment, DEFAULT_COMMENT)
    }

    pub fn with_default_comment(
        lat: f64,
        lng: f64,
        comment: impl AsRef<str>,
        default_comment: &str,
    ) -> Self {
        Self {
            lat: normalize(lat),
            lng: normalize(lng),
            comment: canonical_comment(comment.as_ref(), default_comment),
        }
    }

    /// Checked variant of [`Point::new`] that rejects non-finite coordinates.
    pub fn try_new(lat: f64, lng: f64, comment: impl AsRef<str>) -> Result<Self> {
        if !(lat.is_finite() && lng.is_finite()) {
            return Err(Error::InvalidCoordinate { lat, lng });
        }
        Ok(Self::new(lat, lng, comment))
    }

    pub fn key(&self) -> CoordKey {
        CoordKey::new(self.lat, self.lng)
    }

    /// Exact equality of the normalized coordinates; comments are ignored.
    pub fn same_location(&self, other: &Point) -> bool {
        self.key() == other.key()
    }

    pub fn is_at(&self, lat: f64, lng: f64) -> bool {
        self.key() == CoordKey::new(lat, lng)
    }
}

/// Hashable identity of a normalized `(lat, lng)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_bits: u64,
    lng_bits: u64,
}

impl CoordKey {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat_bits: normalize(lat).to_bits(),
            lng_bits: normalize(lng).to_bits(),
        }
    }
}

/// Sanitized `comment`, or the sanitized default when it is blank. A default that is blank
/// itself falls back to [`DEFAULT_COMMENT`].
pub(crate) fn canonical_comment(comment: &str, default_comment: &str) -> String {
    let sanitized = sanitize_comment(comment);
    if !sanitized.trim().is_empty() {
        return sanitized;
    }
    let default = sanitize_comment(default_comment);
    if default.trim().is_empty() {
        DEFAULT_COMMENT.to_string()
    } else {
        default
    }
}
