use crate::codec::{FIELD_SEPARATOR, parse_coordinate};
use crate::permalink::PermalinkFormat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum LineKind<'a> {
    Blank,
    /// A foreign marker permalink; coordinates still need to be read from it.
    Permalink,
    /// The token of the line that links back into this map.
    SelfLink(&'a str),
    /// Any other `http(s)://` line.
    OtherUrl,
    Coordinates { lat: f64, lng: f64 },
    Text,
}

pub(crate) struct LineClassifier<'a> {
    pub(crate) permalinks: &'a PermalinkFormat,
    pub(crate) self_link_marker: &'a str,
}

impl<'a> LineClassifier<'a> {
    /// `line` is expected to be trimmed already.
    pub(crate) fn classify<'l>(&self, line: &'l str) -> LineKind<'l> {
        if line.is_empty() {
            return LineKind::Blank;
        }
        if self.permalinks.matches(line) {
            return LineKind::Permalink;
        }
        if let Some(token) = line
            .split_whitespace()
            .find(|token| token.contains(self.self_link_marker))
        {
            return LineKind::SelfLink(token);
        }
        if starts_with_url_scheme(line) {
            return LineKind::OtherUrl;
        }
        if let Some((lat, lng)) = parse_coordinate_pair(line) {
            return LineKind::Coordinates { lat, lng };
        }
        LineKind::Text
    }
}

pub(crate) fn starts_with_url_scheme(line: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        line.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// `lat,lng` with exactly two numeric fields.
pub(crate) fn parse_coordinate_pair(line: &str) -> Option<(f64, f64)> {
    let (lat, lng) = line.split_once(FIELD_SEPARATOR)?;
    if lng.contains(FIELD_SEPARATOR) {
        return None;
    }
    Some((parse_coordinate(lat)?, parse_coordinate(lng)?))
}
