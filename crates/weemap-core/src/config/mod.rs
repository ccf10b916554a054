use crate::point::DEFAULT_COMMENT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_URL: &str = "https://weemap.org/";
pub const DEFAULT_PERMALINK_BASE: &str = "https://www.openstreetmap.org/";
pub const DEFAULT_PERMALINK_ZOOM: u8 = 15;
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
/// Roughly how many markers fit in a link before the URL gets unwieldy.
pub const DEFAULT_LINK_CAPACITY: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Address of the map page. Shared links are rooted here and embedded links to this host
    /// are recognized on import.
    pub site_url: String,
    /// Base of the external "map marker" permalinks produced by export and read by import.
    pub permalink_base: String,
    pub permalink_zoom: u8,
    pub default_comment: String,
    pub geocoder_endpoint: String,
    pub link_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            permalink_base: DEFAULT_PERMALINK_BASE.to_string(),
            permalink_zoom: DEFAULT_PERMALINK_ZOOM,
            default_comment: DEFAULT_COMMENT.to_string(),
            geocoder_endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            link_capacity: DEFAULT_LINK_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn with_permalink_base(mut self, permalink_base: impl Into<String>) -> Self {
        self.permalink_base = permalink_base.into();
        self
    }

    pub fn with_permalink_zoom(mut self, zoom: u8) -> Self {
        self.permalink_zoom = zoom;
        self
    }

    pub fn with_default_comment(mut self, comment: impl Into<String>) -> Self {
        self.default_comment = comment.into();
        self
    }

    pub fn with_geocoder_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.geocoder_endpoint = endpoint.into();
        self
    }

    pub fn with_link_capacity(mut self, capacity: usize) -> Self {
        self.link_capacity = capacity;
        self
    }

    /// The text that marks an embedded link back to this map, e.g. `weemap.org/#`.
    ///
    /// Scheme and `www.` are ignored so that `http://weemap.org/#...` and
    /// `https://www.weemap.org/#...` are both recognized.
    pub fn self_link_marker(&self) -> String {
        let without_scheme = self
            .site_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.site_url);
        let without_www = without_scheme
            .strip_prefix("www.")
            .unwrap_or(without_scheme);
        let without_fragment = without_www.split('#').next().unwrap_or(without_www);
        let trimmed = without_fragment.trim_end_matches('/');
        format!("{trimmed}/#")
    }
}
