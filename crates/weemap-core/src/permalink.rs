//! External "map marker" permalinks, e.g.
//! `https://www.openstreetmap.org/?mlat=51.5007&mlon=-0.1246&zoom=15`.

use crate::codec::{format_coordinate, parse_coordinate};
use crate::config::Config;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn marker_params_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]mlat=[^&#]*&(?:[^#]*&)?mlon=").expect("valid regex"))
}

#[derive(Debug, Clone)]
pub struct PermalinkFormat {
    base: String,
    zoom: u8,
    prefix_re: Regex,
}

impl PermalinkFormat {
    pub fn new(base: &str, zoom: u8) -> Self {
        let prefix = base.trim_end_matches('/');
        let prefix_re = Regex::new(&format!(r"^(?i:{})(?:[/?]|$)", regex::escape(prefix)))
            .expect("escaped prefix is a valid regex");
        Self {
            base: base.to_string(),
            zoom,
            prefix_re,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.permalink_base, config.permalink_zoom)
    }

    /// Whether `line` looks like a marker permalink of this service. The coordinates are not
    /// validated here; see [`PermalinkFormat::parse`].
    pub fn matches(&self, line: &str) -> bool {
        self.prefix_re.is_match(line) && marker_params_regex().is_match(line)
    }

    /// Reads the `mlat`/`mlon` query parameters.
    pub fn parse(&self, line: &str) -> Result<(f64, f64), String> {
        let url = Url::parse(line).map_err(|err| err.to_string())?;

        let mut lat = None;
        let mut lng = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "mlat" if lat.is_none() => lat = Some(value.into_owned()),
                "mlon" if lng.is_none() => lng = Some(value.into_owned()),
                _ => {}
            }
        }

        let lat = lat.ok_or_else(|| "missing mlat parameter".to_string())?;
        let lng = lng.ok_or_else(|| "missing mlon parameter".to_string())?;
        let lat = parse_coordinate(&lat).ok_or_else(|| format!("invalid mlat value '{lat}'"))?;
        let lng = parse_coordinate(&lng).ok_or_else(|| format!("invalid mlon value '{lng}'"))?;
        Ok((lat, lng))
    }

    pub fn build(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}?mlat={}&mlon={}&zoom={}",
            self.base,
            format_coordinate(lat),
            format_coordinate(lng),
            self.zoom
        )
    }
}

impl Default for PermalinkFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
