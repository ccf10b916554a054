//! Persistence of the marker collection.
//!
//! The collection lives in the fragment of a page address. Stores only ever replace the whole
//! address: callers load, compute the new collection and save it back in one step.

use crate::Result;
use crate::codec::{decode_url, to_url};
use crate::point::{Point, PointCollection};
use std::path::{Path, PathBuf};

pub trait StateStore {
    fn load(&self) -> Result<PointCollection>;

    /// Replaces the persisted collection with `points`.
    fn save(&mut self, points: &[Point]) -> Result<()>;

    /// The current page address, fragment included.
    fn url(&self) -> Result<String>;
}

/// A page address held in memory; `save` behaves like replacing the browser history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStore {
    url: String,
}

impl UrlStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl StateStore for UrlStore {
    fn load(&self) -> Result<PointCollection> {
        Ok(decode_url(&self.url))
    }

    fn save(&mut self, points: &[Point]) -> Result<()> {
        self.url = to_url(&self.url, points);
        Ok(())
    }

    fn url(&self) -> Result<String> {
        Ok(self.url.clone())
    }
}

/// A page address persisted in a text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    base_url: String,
}

impl FileStore {
    /// `base_url` is used when the file does not exist yet.
    pub fn new(path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_url: base_url.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "weemap".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<PointCollection> {
        Ok(self
            .read()?
            .map(|url| decode_url(&url))
            .unwrap_or_default())
    }

    fn save(&mut self, points: &[Point]) -> Result<()> {
        let current = self.read()?.unwrap_or_else(|| self.base_url.clone());
        let next = to_url(&current, points);

        let tmp = self.temp_path();
        std::fs::write(&tmp, format!("{next}\n"))?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), points = points.len(), "saved markers");
        Ok(())
    }

    fn url(&self) -> Result<String> {
        Ok(self.read()?.unwrap_or_else(|| self.base_url.clone()))
    }
}
