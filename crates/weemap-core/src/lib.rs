#![forbid(unsafe_code)]

//! Marker state for a shareable map (headless).
//!
//! The whole marker collection lives in the fragment of a page address
//! (`#lat,lng,comment;lat,lng,comment`). This crate owns that encoding plus the operations
//! around it:
//! - coordinate normalization and comment sanitizing
//! - fragment encode/decode (tolerant of hand-edited input)
//! - dedup merge of collections
//! - import of pasted permalinks, coordinate lines and embedded links
//! - export as `comment` + permalink blocks
//! - runtime-agnostic async place search (no specific executor required)

pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod geocode;
pub mod import;
pub mod merge;
pub mod permalink;
pub mod point;
pub mod sanitize;
pub mod session;
pub mod store;
pub mod view;

pub use codec::{decode_fragment, decode_url, encode_fragment, to_url};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_with_config, format_export};
pub use geocode::{GeocodeHit, Geocoder};
pub use import::{ImportParser, ImportReport, parse_import};
pub use merge::merge;
pub use permalink::PermalinkFormat;
pub use point::{DEFAULT_COMMENT, Point, PointCollection, normalize};
pub use sanitize::sanitize_comment;
pub use session::MarkerSession;
pub use store::{FileStore, StateStore, UrlStore};
pub use view::{Bounds, MarkerView};

#[cfg(test)]
mod tests;
