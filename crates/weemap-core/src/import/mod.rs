//! Tolerant parser for pasted marker lists.
//!
//! Three shapes are accepted and may be interleaved:
//!
//! ```text
//! Big Ben
//! https://www.openstreetmap.org/?mlat=51.5007&mlon=-0.1246&zoom=15
//!
//! 51.5,-0.09
//! River view
//!
//! https://weemap.org/#40.7128,-74.006,NYC;48.85837,2.294481,Eiffel%20Tower
//! ```
//!
//! Records are flushed as soon as both a location and a comment (or the default) are known.

mod line;

use crate::codec::{decode_fragment, decode_url};
use crate::config::Config;
use crate::merge::extend_unique;
use crate::permalink::PermalinkFormat;
use crate::point::{Point, PointCollection};
use crate::sanitize::sanitize_comment;
use crate::{Error, Result};
use line::{LineClassifier, LineKind, starts_with_url_scheme};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub points: PointCollection,
    /// Records that were recognized but collided with an earlier location.
    pub duplicates: usize,
    /// Permalink lines that could not be read.
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    HaveComment(String),
    HaveCoordinate { lat: f64, lng: f64 },
}

#[derive(Debug, Clone)]
pub struct ImportParser {
    permalinks: PermalinkFormat,
    self_link_marker: String,
    default_comment: String,
}

impl Default for ImportParser {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ImportParser {
    pub fn new(config: &Config) -> Self {
        Self {
            permalinks: PermalinkFormat::from_config(config),
            self_link_marker: config.self_link_marker(),
            default_comment: config.default_comment.clone(),
        }
    }

    pub fn parse(&self, text: &str) -> Result<ImportReport> {
        let classifier = LineClassifier {
            permalinks: &self.permalinks,
            self_link_marker: &self.self_link_marker,
        };
        let mut run = Run {
            parser: self,
            report: ImportReport::default(),
        };

        let mut state = State::Idle;
        for raw in text.lines() {
            let line = raw.trim();
            state = run.step(state, line, classifier.classify(line))?;
        }
        run.finish(state);

        Ok(run.report)
    }
}

struct Run<'p> {
    parser: &'p ImportParser,
    report: ImportReport,
}

impl Run<'_> {
    fn step(&mut self, state: State, line: &str, kind: LineKind<'_>) -> Result<State> {
        if let State::HaveCoordinate { lat, lng } = state {
            if starts_with_url_scheme(line) {
                self.emit(lat, lng, None);
                return self.step(State::Idle, line, kind);
            }
            self.emit(lat, lng, Some(&pending_comment(line)));
            return Ok(State::Idle);
        }

        match kind {
            LineKind::Blank | LineKind::OtherUrl => Ok(state),
            LineKind::Permalink => match self.parser.permalinks.parse(line) {
                Ok((lat, lng)) => {
                    let comment = match &state {
                        State::HaveComment(comment) => Some(comment.as_str()),
                        _ => None,
                    };
                    self.emit(lat, lng, comment);
                    Ok(State::Idle)
                }
                Err(reason) => {
                    tracing::debug!(line, reason, "skipping unreadable permalink");
                    self.report.skipped_lines += 1;
                    Ok(state)
                }
            },
            LineKind::SelfLink(token) => match decode_self_link(token)? {
                Some(points) => {
                    self.absorb(points);
                    Ok(state)
                }
                None => self.step(state, line, LineKind::Text),
            },
            LineKind::Coordinates { lat, lng } => match state {
                State::Idle => Ok(State::HaveCoordinate { lat, lng }),
                other => Ok(other),
            },
            LineKind::Text => match state {
                State::Idle => {
                    let comment = pending_comment(line);
                    if comment.is_empty() {
                        Ok(State::Idle)
                    } else {
                        Ok(State::HaveComment(comment))
                    }
                }
                other => Ok(other),
            },
        }
    }

    fn finish(&mut self, state: State) {
        match state {
            State::HaveCoordinate { lat, lng } => self.emit(lat, lng, None),
            State::HaveComment(comment) => {
                tracing::debug!(comment, "discarding comment without a location");
            }
            State::Idle => {}
        }
    }

    fn emit(&mut self, lat: f64, lng: f64, comment: Option<&str>) {
        let point = Point::with_default_comment(
            lat,
            lng,
            comment.unwrap_or_default(),
            &self.parser.default_comment,
        );
        self.absorb(vec![point]);
    }

    fn absorb(&mut self, points: PointCollection) {
        let offered = points.len();
        let added = extend_unique(&mut self.report.points, points);
        self.report.duplicates += offered - added;
    }
}

fn pending_comment(line: &str) -> String {
    sanitize_comment(line).trim().to_string()
}

/// Points carried by a link back into this map. `None` when a token without a scheme turns out
/// not to be a link at all; the line is then ordinary text.
fn decode_self_link(token: &str) -> Result<Option<PointCollection>> {
    if starts_with_url_scheme(token) {
        let url = Url::parse(token).map_err(|err| Error::MalformedLink {
            link: token.to_string(),
            message: err.to_string(),
        })?;
        return Ok(Some(url.fragment().map(decode_fragment).unwrap_or_default()));
    }

    let points = match Url::parse(&format!("https://{token}")) {
        Ok(url) => url.fragment().map(decode_fragment).unwrap_or_default(),
        Err(err) => {
            tracing::debug!(token, %err, "reading link text without url parsing");
            decode_url(token)
        }
    };
    Ok((!points.is_empty()).then_some(points))
}

/// Parses pasted text with the default configuration.
pub fn parse_import(text: &str) -> Result<ImportReport> {
    ImportParser::default().parse(text)
}
