//! Durable key-value storage over named collections
//!
//! A [`StoreAdapter`] is the slow, asynchronous side of persistence. Nothing
//! outside [`crate::cache`] talks to it directly: consumers read and write
//! through the Cache, which mirrors every collection in memory.
//!
//! # Backends
//!
//! | Backend | Durable | Use |
//! |---------|---------|-----|
//! | [`FileStore`] | yes | one JSON array file per collection |
//! | [`MemoryStore`] | no | tests and `store.in_memory = true` |

pub mod file;
pub mod legacy;
pub mod memory;

pub use file::FileStore;
pub use legacy::LegacySource;
pub use memory::MemoryStore;

use crate::error::{ClassroomError, ClassroomResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted value: a JSON object carrying its collection's key field
pub type Record = serde_json::Value;

/// Named collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Teachers,
    Students,
    Homework,
    Submissions,
    CodeLibrary,
    Templates,
    Settings,
    Projects,
}

impl Collection {
    /// Every collection, in creation order
    pub const ALL: [Collection; 8] = [
        Self::Teachers,
        Self::Students,
        Self::Homework,
        Self::Submissions,
        Self::CodeLibrary,
        Self::Templates,
        Self::Settings,
        Self::Projects,
    ];

    /// Collections whose joint emptiness marks a first run
    pub const PRIMARY: [Collection; 5] = [
        Self::Teachers,
        Self::Students,
        Self::Homework,
        Self::Submissions,
        Self::CodeLibrary,
    ];

    /// Collections carried by a database snapshot
    pub const SNAPSHOT: [Collection; 6] = [
        Self::Teachers,
        Self::Students,
        Self::Homework,
        Self::Submissions,
        Self::CodeLibrary,
        Self::Templates,
    ];

    /// Stable collection name, shared by file names and snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Self::Teachers => "teachers",
            Self::Students => "students",
            Self::Homework => "homework",
            Self::Submissions => "submissions",
            Self::CodeLibrary => "codeLibrary",
            Self::Templates => "templates",
            Self::Settings => "settings",
            Self::Projects => "projects",
        }
    }

    /// Field of each record that holds its key
    pub fn key_field(&self) -> &'static str {
        match self {
            Self::Projects => "userId",
            Self::Settings => "key",
            _ => "id",
        }
    }

    /// Look up a collection by its stable name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Extract the key of a record in this collection
    ///
    /// String keys are used as-is; numeric keys are stringified.
    pub fn key_of(&self, record: &Record) -> Option<String> {
        match record.get(self.key_field())? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Extract the key of a record, failing when it is absent
    pub fn require_key(&self, record: &Record) -> ClassroomResult<String> {
        self.key_of(record).ok_or_else(|| ClassroomError::MissingKey {
            collection: self.name().to_string(),
            field: self.key_field().to_string(),
        })
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Asynchronous durable storage interface
///
/// Implementations only need to be correct for sequential use: the Cache
/// funnels all writes through a single worker.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Create any missing collections and make the store usable
    async fn open(&self, collections: &[Collection]) -> ClassroomResult<()>;

    /// Read every record of a collection
    async fn get_all(&self, collection: Collection) -> ClassroomResult<Vec<Record>>;

    /// Read one record by key
    async fn get(&self, collection: Collection, key: &str) -> ClassroomResult<Option<Record>>;

    /// Insert or replace a record (keyed by the collection's key field)
    async fn put(&self, collection: Collection, record: Record) -> ClassroomResult<()>;

    /// Remove a record by key; missing keys are not an error
    async fn delete(&self, collection: Collection, key: &str) -> ClassroomResult<()>;

    /// Remove every record of a collection
    async fn clear(&self, collection: Collection) -> ClassroomResult<()>;

    /// Human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Insert or replace `record` in `records`, keeping insertion order
pub(crate) fn upsert(
    records: &mut Vec<Record>,
    collection: Collection,
    record: Record,
) -> ClassroomResult<()> {
    let key = collection.require_key(&record)?;
    match records
        .iter()
        .position(|r| collection.key_of(r).as_deref() == Some(key.as_str()))
    {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
    Ok(())
}

/// Remove the record with `key` from `records`
pub(crate) fn remove(records: &mut Vec<Record>, collection: Collection, key: &str) {
    records.retain(|r| collection.key_of(r).as_deref() != Some(key));
}
