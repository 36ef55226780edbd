//! JSON file backing the local storage area.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Suffix of the file written before the rename over the record.
const TEMP_SUFFIX: &str = ".part";

/// Key-value record persisted as one JSON object.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record; a missing file is an empty record.
    pub fn load(&self) -> Result<Map<String, Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read storage: {}", self.path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse storage: {}", self.path.display()))
    }

    /// Record to write back into. Unparseable contents are replaced rather
    /// than blocking every later write; read failures still surface.
    pub fn load_for_update(&self) -> Result<Map<String, Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read storage: {}", self.path.display()))
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "storage file is corrupt, starting from an empty record: {e}"
                );
                Ok(Map::new())
            }
        }
    }

    /// Replace the record on disk (creates the parent dir if needed).
    ///
    /// Written to a `.part` file first and renamed over the record, so an
    /// interrupted write leaves the previous record intact.
    pub fn save(&self, record: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(record).context("serialize storage")?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)
            .with_context(|| format!("write storage: {}", temp.display()))?;
        std::fs::rename(&temp, &self.path).with_context(|| {
            format!("rename {} to {}", temp.display(), self.path.display())
        })?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut o = self.path.as_os_str().to_owned();
        o.push(TEMP_SUFFIX);
        PathBuf::from(o)
    }

    /// Serialized size of the record in bytes.
    pub fn bytes_in_use(&self) -> Result<u64> {
        let record = self.load()?;
        let json = serde_json::to_string(&record).context("serialize storage")?;
        Ok(json.len() as u64)
    }
}
