//! Flat legacy data source
//!
//! Older installs kept one serialized array per collection name with no
//! hierarchy. The directory layout is `<dir>/<collection-name>.json`. It is
//! read once, on a first run, and every failure is swallowed: a collection
//! that cannot be read or is not an array of keyed objects simply stays empty.

use super::{Collection, Record};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Read-only source of legacy collection arrays
#[derive(Debug, Clone)]
pub struct LegacySource {
    dir: PathBuf,
}

impl LegacySource {
    /// Create a source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the legacy arrays
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read one collection, returning an empty list on any failure
    pub async fn read(&self, collection: Collection) -> Vec<Record> {
        let path = self.dir.join(format!("{}.json", collection.name()));
        if !path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping legacy {}: {}", collection, e);
                return Vec::new();
            }
        };

        match parse_array(collection, &content) {
            Some(records) => {
                debug!("Read {} legacy record(s) for {}", records.len(), collection);
                records
            }
            None => {
                warn!("Skipping legacy {}: not an array of keyed records", collection);
                Vec::new()
            }
        }
    }
}

/// Parse a serialized array whose every element is a keyed object
pub(crate) fn parse_array(collection: Collection, content: &str) -> Option<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    validate_array(collection, value)
}

/// Accept `value` only when it is an array of objects carrying a key
pub(crate) fn validate_array(
    collection: Collection,
    value: serde_json::Value,
) -> Option<Vec<Record>> {
    let serde_json::Value::Array(items) = value else {
        return None;
    };
    if items
        .iter()
        .all(|item| item.is_object() && collection.key_of(item).is_some())
    {
        Some(items)
    } else {
        None
    }
}
