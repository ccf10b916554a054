//! The interactive use cases of the map page, expressed over a [`StateStore`].
//!
//! Every mutating operation loads the collection, computes the new one and saves it back.

use crate::codec::to_url;
use crate::config::Config;
use crate::export::format_export;
use crate::geocode::Geocoder;
use crate::import::{ImportParser, ImportReport};
use crate::merge::extend_unique;
use crate::permalink::PermalinkFormat;
use crate::point::{Point, PointCollection, canonical_comment};
use crate::store::StateStore;
use crate::view::{Bounds, MarkerView};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct MarkerSession<S> {
    store: S,
    config: Config,
}

impl<S: StateStore> MarkerSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn points(&self) -> Result<PointCollection> {
        self.store.load()
    }

    /// Places a new marker with the default comment. Placement never deduplicates.
    pub fn add_point(&mut self, lat: f64, lng: f64) -> Result<Point> {
        if !(lat.is_finite() && lng.is_finite()) {
            tracing::warn!(lat, lng, "refusing to place marker at invalid coordinates");
            return Err(Error::InvalidCoordinate { lat, lng });
        }
        let point = Point::with_default_comment(lat, lng, "", &self.config.default_comment);
        let mut points = self.store.load()?;
        points.push(point.clone());
        self.save(&points)?;
        Ok(point)
    }

    /// Replaces the comment of the first marker at `(lat, lng)`. Blank input leaves everything
    /// unchanged. Returns whether a marker was updated.
    pub fn edit_comment(&mut self, lat: f64, lng: f64, comment: &str) -> Result<bool> {
        if comment.trim().is_empty() {
            return Ok(false);
        }
        let mut points = self.store.load()?;
        let Some(point) = points.iter_mut().find(|p| p.is_at(lat, lng)) else {
            tracing::debug!(lat, lng, "no marker to edit");
            return Ok(false);
        };
        point.comment = canonical_comment(comment, &self.config.default_comment);
        self.save(&points)?;
        Ok(true)
    }

    /// Removes the first marker at `(lat, lng)`.
    pub fn remove_point(&mut self, lat: f64, lng: f64) -> Result<Option<Point>> {
        let mut points = self.store.load()?;
        let Some(idx) = points.iter().position(|p| p.is_at(lat, lng)) else {
            tracing::debug!(lat, lng, "no marker to remove");
            return Ok(None);
        };
        let removed = points.remove(idx);
        self.save(&points)?;
        Ok(Some(removed))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.save(&[])
    }

    /// Parses pasted text and merges the result into the stored collection. On a parse error
    /// the stored collection is left untouched.
    pub fn import(&mut self, text: &str) -> Result<ImportReport> {
        let mut report = ImportParser::new(&self.config).parse(text)?;
        let mut points = self.store.load()?;
        let offered = report.points.len();
        let added = extend_unique(&mut points, report.points.iter().cloned());
        report.duplicates += offered - added;
        tracing::info!(added, duplicates = report.duplicates, "imported markers");
        self.save(&points)?;
        Ok(report)
    }

    /// Merges a single point, e.g. a chosen search result. Returns whether it was new.
    pub fn adopt(&mut self, point: Point) -> Result<bool> {
        Ok(self.adopt_all([point])? == 1)
    }

    /// Merges `points` with one load and at most one save. Returns how many were new.
    pub fn adopt_all(&mut self, points: impl IntoIterator<Item = Point>) -> Result<usize> {
        let mut stored = self.store.load()?;
        let added = extend_unique(&mut stored, points);
        if added > 0 {
            self.save(&stored)?;
        }
        Ok(added)
    }

    pub fn export(&self) -> Result<String> {
        let points = self.store.load()?;
        Ok(format_export(
            &points,
            &PermalinkFormat::from_config(&self.config),
        ))
    }

    /// A link to the configured site carrying the whole collection.
    pub fn share_url(&self) -> Result<String> {
        let points = self.store.load()?;
        Ok(to_url(&self.config.site_url, &points))
    }

    /// Places every stored marker on `view` and fits the view around them.
    pub fn render<V: MarkerView>(&self, view: &mut V) -> Result<Vec<V::Handle>> {
        let points = self.store.load()?;
        let handles = points.iter().map(|p| view.place_point(p)).collect();
        if let Some(bounds) = Bounds::of(&points) {
            view.fit_bounds(bounds);
        }
        Ok(handles)
    }

    /// Looks `query` up inside `bounds`. Results are returned as candidate points and are not
    /// stored; pass the chosen one to [`MarkerSession::adopt`].
    pub async fn search<G: Geocoder>(
        &self,
        geocoder: &G,
        query: &str,
        bounds: &Bounds,
    ) -> Result<PointCollection> {
        let hits = geocoder.search(query, bounds).await?;
        tracing::debug!(query, hits = hits.len(), "geocoder answered");
        Ok(hits
            .iter()
            .filter(|hit| hit.lat.is_finite() && hit.lng.is_finite())
            .map(|hit| hit.to_point(&self.config.default_comment))
            .collect())
    }

    fn save(&mut self, points: &[Point]) -> Result<()> {
        self.store.save(points)?;
        if points.len() > self.config.link_capacity {
            tracing::warn!(
                markers = points.len(),
                capacity = self.config.link_capacity,
                "marker link is getting long"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::DEFAULT_COMMENT;
    use crate::store::UrlStore;

    #[test]
    fn add_point_appends_without_dedup() {
        let mut session = MarkerSession::new(UrlStore::new("https://weemap.org/"));
        session.add_point(51.5, -0.09).unwrap();
        session.add_point(51.5, -0.09).unwrap();
        assert_eq!(
            session.store().as_str(),
            "https://weemap.org/#51.5,-0.09,wee;51.5,-0.09,wee"
        );
    }

    #[test]
    fn add_point_rejects_non_finite_coordinates() {
        let mut session = MarkerSession::new(UrlStore::new("https://weemap.org/#1,2,a"));
        let err = session.add_point(f64::NAN, 2.0).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
        assert_eq!(session.store().as_str(), "https://weemap.org/#1,2,a");
    }

    #[test]
    fn configured_default_comment_is_used_for_new_markers() {
        let config = Config::default().with_default_comment("pin");
        let mut session = MarkerSession::with_config(UrlStore::new("https://weemap.org/"), config);
        assert_eq!(session.add_point(1.0, 2.0).unwrap().comment, "pin");
    }

    #[test]
    fn blank_configured_default_falls_back_to_builtin() {
        let config = Config::default().with_default_comment("<>");
        let mut session = MarkerSession::with_config(UrlStore::new("https://weemap.org/"), config);
        let placed = session.add_point(1.0, 2.0).unwrap();
        assert_eq!(placed.comment, DEFAULT_COMMENT);
        assert_eq!(session.points().unwrap(), vec![placed]);
        assert_eq!(session.store().as_str(), "https://weemap.org/#1,2,wee");
    }
}
