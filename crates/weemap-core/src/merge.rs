use crate::point::{CoordKey, Point, PointCollection};
use rustc_hash::FxHashSet;

/// Combines two collections, keyed on exact equality of the normalized coordinates.
///
/// `existing` is kept untouched and in order. Each incoming point is canonicalized (normalized,
/// sanitized) and appended only if no point at the same location has been seen yet, so the
/// first-seen comment always wins.
pub fn merge(existing: &[Point], incoming: &[Point]) -> PointCollection {
    let mut out = existing.to_vec();
    extend_unique(&mut out, incoming.iter().cloned());
    out
}

/// In-place variant of [`merge`]. Returns how many points were appended.
pub fn extend_unique(
    points: &mut PointCollection,
    incoming: impl IntoIterator<Item = Point>,
) -> usize {
    let mut seen: FxHashSet<CoordKey> = points.iter().map(Point::key).collect();
    let before = points.len();

    for candidate in incoming {
        if !(candidate.lat.is_finite() && candidate.lng.is_finite()) {
            tracing::debug!(
                lat = candidate.lat,
                lng = candidate.lng,
                "dropping incoming point with non-finite coordinates"
            );
            continue;
        }
        let candidate = Point::new(candidate.lat, candidate.lng, &candidate.comment);
        if seen.insert(candidate.key()) {
            points.push(candidate);
        } else {
            tracing::debug!(
                lat = candidate.lat,
                lng = candidate.lng,
                "skipping duplicate location"
            );
        }
    }

    points.len() - before
}
