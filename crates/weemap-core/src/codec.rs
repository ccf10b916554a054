//! URL fragment codec for the marker collection.
//!
//! Layout: `lat,lng,comment;lat,lng,comment;...` where the comment is percent-encoded the way
//! `encodeURIComponent` does it and the coordinates are normalized and written with JavaScript
//! number formatting (`51.5`, `-0.09`, no trailing zeros).

use crate::point::{DEFAULT_COMMENT, Point, PointCollection, canonical_comment, normalize};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use ryu_js::Buffer;

pub const RECORD_SEPARATOR: char = ';';
pub const FIELD_SEPARATOR: char = ',';

// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Formats a coordinate the way JavaScript's `Number#toString` would after normalization.
pub fn format_coordinate(v: f64) -> String {
    let v = normalize(v);
    if !v.is_finite() {
        return "NaN".to_string();
    }
    let mut b = Buffer::new();
    b.format_finite(v).to_string()
}

/// Parses a coordinate field. The whole (trimmed) field must be a finite decimal number.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    value.is_finite().then(|| normalize(value))
}

pub fn encode_comment(comment: &str) -> String {
    utf8_percent_encode(comment, COMPONENT).to_string()
}

/// Strict percent-decoding: a stray `%` or an escape sequence that is not UTF-8 fails.
pub fn decode_comment(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(from_hex_byte);
            let lo = bytes.get(i + 2).copied().and_then(from_hex_byte);
            if hi.is_none() || lo.is_none() {
                return None;
            }
            i += 3;
            continue;
        }
        i += 1;
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

fn from_hex_byte(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn encode_record(point: &Point) -> String {
    format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
        format_coordinate(point.lat),
        format_coordinate(point.lng),
        encode_comment(&canonical_comment(&point.comment, DEFAULT_COMMENT))
    )
}

/// Encodes the collection into a fragment (without the leading `#`). Comments are written in
/// canonical form. An empty collection encodes to an empty string.
pub fn encode_fragment(points: &[Point]) -> String {
    points
        .iter()
        .map(encode_record)
        .collect::<Vec<_>>()
        .join(";")
}

fn decode_record(record: &str) -> Option<Point> {
    let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
    let [lat, lng, comment] = fields.as_slice() else {
        tracing::debug!(
            record,
            fields = fields.len(),
            "dropping record with wrong field count"
        );
        return None;
    };

    let (Some(lat), Some(lng)) = (parse_coordinate(lat), parse_coordinate(lng)) else {
        tracing::debug!(record, "dropping record with invalid coordinates");
        return None;
    };

    let Some(comment) = decode_comment(comment) else {
        tracing::debug!(record, "dropping record with undecodable comment");
        return None;
    };

    Some(Point::new(lat, lng, comment))
}

/// Decodes a fragment (the part after `#`). Malformed records are dropped; this never fails.
pub fn decode_fragment(fragment: &str) -> PointCollection {
    fragment
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.is_empty())
        .filter_map(decode_record)
        .collect()
}

/// Decodes the fragment of a full address. No `#` means no markers.
pub fn decode_url(url: &str) -> PointCollection {
    match fragment_of(url) {
        Some(fragment) => decode_fragment(fragment),
        None => PointCollection::new(),
    }
}

pub fn fragment_of(url: &str) -> Option<&str> {
    url.find('#').map(|idx| &url[idx + 1..])
}

/// Replaces the fragment of `url` in place. An empty fragment removes the `#` entirely.
pub fn replace_fragment(url: &str, fragment: &str) -> String {
    let base = match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    };
    if fragment.is_empty() {
        base.to_string()
    } else {
        format!("{base}#{fragment}")
    }
}

/// Shareable address for `points` rooted at `base`.
pub fn to_url(base: &str, points: &[Point]) -> String {
    replace_fragment(base, &encode_fragment(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_coordinate_matches_js_number_formatting() {
        assert_eq!(format_coordinate(51.5), "51.5");
        assert_eq!(format_coordinate(-0.09), "-0.09");
        assert_eq!(format_coordinate(51.500000), "51.5");
        assert_eq!(format_coordinate(13.0), "13");
        assert_eq!(format_coordinate(-0.0), "0");
        assert_eq!(format_coordinate(0.0000001), "0");
        assert_eq!(format_coordinate(0.000001), "0.000001");
        assert_eq!(format_coordinate(52.52000659999), "52.520007");
    }

    #[test]
    fn parse_coordinate_requires_finite_numbers() {
        assert_eq!(parse_coordinate(" 51.5 "), Some(51.5));
        assert_eq!(parse_coordinate("-74.0060001"), Some(-74.006));
        assert_eq!(parse_coordinate("1e1"), Some(10.0));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("abc"), None);
        assert_eq!(parse_coordinate("12abc"), None);
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate("inf"), None);
        assert_eq!(parse_coordinate("-Infinity"), None);
    }

    #[test]
    fn encode_comment_matches_encode_uri_component() {
        assert_eq!(encode_comment("Tower Bridge"), "Tower%20Bridge");
        assert_eq!(encode_comment("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_comment("Café"), "Caf%C3%A9");
        assert_eq!(encode_comment("50%#/?+"), "50%25%23%2F%3F%2B");
        assert_eq!(encode_comment("a,b;c"), "a%2Cb%3Bc");
    }

    #[test]
    fn decode_comment_is_strict_about_escapes() {
        assert_eq!(decode_comment("Tower%20Bridge").as_deref(), Some("Tower Bridge"));
        assert_eq!(decode_comment("Caf%c3%a9").as_deref(), Some("Café"));
        assert_eq!(decode_comment("a+b").as_deref(), Some("a+b"));
        assert_eq!(decode_comment("100%"), None);
        assert_eq!(decode_comment("%zz"), None);
        assert_eq!(decode_comment("%4"), None);
        assert_eq!(decode_comment("%C3"), None);
    }

    #[test]
    fn replace_fragment_handles_existing_and_empty_fragments() {
        assert_eq!(
            replace_fragment("https://weemap.org/", "1,2,x"),
            "https://weemap.org/#1,2,x"
        );
        assert_eq!(
            replace_fragment("https://weemap.org/#old", "1,2,x"),
            "https://weemap.org/#1,2,x"
        );
        assert_eq!(
            replace_fragment("https://weemap.org/#old", ""),
            "https://weemap.org/"
        );
    }

    #[test]
    fn fragment_of_uses_first_hash() {
        assert_eq!(fragment_of("https://weemap.org/#a#b"), Some("a#b"));
        assert_eq!(fragment_of("#1,2,x"), Some("1,2,x"));
        assert_eq!(fragment_of("https://weemap.org/"), None);
    }
}
