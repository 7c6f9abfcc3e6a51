//! Synchronous in-memory mirror of the backing store
//!
//! The Cache is hydrated once from a [`StoreAdapter`] and then answers every
//! read from memory. Writes land in memory immediately and are handed to a
//! write-behind worker for the store; callers never wait on the store.
//!
//! # Guarantees
//!
//! | Operation | Visible to reads | Durable |
//! |-----------|------------------|---------|
//! | `put` / `delete` / `clear` | immediately | eventually, best effort |
//! | `flush().await` | n/a | every earlier write has been attempted |
//!
//! Concurrent writes to the same key are last-write-wins with no merge.
//! If the store cannot be opened the Cache keeps working purely in memory.

mod writer;

use crate::error::{ClassroomError, ClassroomResult};
use crate::store::legacy::validate_array;
use crate::store::{upsert, Collection, LegacySource, Record, StoreAdapter};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use writer::{WriteBehind, WriteOp};

/// What happened during the last hydration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Collections the store could not read (left empty)
    pub failed: Vec<Collection>,
    /// Collections filled from the legacy source
    pub legacy_imported: Vec<Collection>,
}

/// Outcome of a database snapshot import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Collections replaced, with their new record counts
    pub imported: Vec<(Collection, usize)>,
    /// Collections present in the snapshot but malformed (left untouched)
    pub skipped: Vec<Collection>,
}

/// Shared handle to the cache; clones refer to the same tables
#[derive(Clone)]
pub struct Cache {
    inner: Arc<Inner>,
}

struct Inner {
    tables: Mutex<HashMap<Collection, Vec<Record>>>,
    store: Arc<dyn StoreAdapter>,
    legacy: Option<LegacySource>,
    writer: Option<WriteBehind>,
    hydration: Mutex<HydrationReport>,
}

impl Cache {
    /// Open the store and hydrate every collection
    ///
    /// Resolving this future is the "ready" point: reads are only meaningful
    /// afterwards. A store that fails to open is logged and the Cache starts
    /// empty with persistence disabled.
    pub async fn open(store: Arc<dyn StoreAdapter>, legacy: Option<LegacySource>) -> Self {
        let writer = match store.open(&Collection::ALL).await {
            Ok(()) => Some(WriteBehind::spawn(Arc::clone(&store))),
            Err(e) => {
                warn!("Store unavailable, continuing in memory only: {}", e);
                None
            }
        };

        let cache = Self {
            inner: Arc::new(Inner {
                tables: Mutex::new(empty_tables()),
                store,
                legacy,
                writer,
                hydration: Mutex::new(HydrationReport::default()),
            }),
        };

        if cache.is_persistent() {
            cache.hydrate().await;
        }
        cache
    }

    /// Read every collection into memory, importing legacy data on first run
    async fn hydrate(&self) -> HydrationReport {
        let mut report = HydrationReport::default();
        let mut loaded = HashMap::new();

        for collection in Collection::ALL {
            let records = match self.inner.store.get_all(collection).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Failed to hydrate {}: {}", collection, e);
                    report.failed.push(collection);
                    Vec::new()
                }
            };
            loaded.insert(collection, keyed_table(collection, records));
        }

        let first_run = Collection::PRIMARY
            .iter()
            .all(|c| loaded.get(c).is_none_or(Vec::is_empty));

        if first_run {
            if let Some(legacy) = &self.inner.legacy {
                debug!("First run, checking legacy data in {}", legacy.dir().display());
                for collection in Collection::PRIMARY {
                    let records = keyed_table(collection, legacy.read(collection).await);
                    if records.is_empty() {
                        continue;
                    }
                    for record in &records {
                        self.persist(WriteOp::Put(collection, record.clone()));
                    }
                    info!("Imported {} legacy record(s) into {}", records.len(), collection);
                    report.legacy_imported.push(collection);
                    loaded.insert(collection, records);
                }
            }
        }

        *self.tables() = loaded;
        *self
            .inner
            .hydration
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = report.clone();
        report
    }

    /// Every record of a collection, in insertion order
    pub fn get_all(&self, collection: Collection) -> Vec<Record> {
        self.tables().get(&collection).cloned().unwrap_or_default()
    }

    /// One record by key
    pub fn get(&self, collection: Collection, key: &str) -> Option<Record> {
        self.tables().get(&collection).and_then(|records| {
            records
                .iter()
                .find(|r| collection.key_of(r).as_deref() == Some(key))
                .cloned()
        })
    }

    /// Insert or replace a record, then persist it in the background
    pub fn put(&self, collection: Collection, record: Record) -> ClassroomResult<()> {
        upsert(
            self.tables().entry(collection).or_default(),
            collection,
            record.clone(),
        )?;
        self.persist(WriteOp::Put(collection, record));
        Ok(())
    }

    /// Remove a record, then persist the removal in the background
    pub fn delete(&self, collection: Collection, key: &str) {
        if let Some(records) = self.tables().get_mut(&collection) {
            crate::store::remove(records, collection, key);
        }
        self.persist(WriteOp::Delete(collection, key.to_string()));
    }

    /// Empty a collection, then persist the clear in the background
    pub fn clear(&self, collection: Collection) {
        self.tables().insert(collection, Vec::new());
        self.persist(WriteOp::Clear(collection));
    }

    /// Wipe every collection in memory and in the store, then hydrate again
    pub async fn clear_all(&self) -> HydrationReport {
        for collection in Collection::ALL {
            self.clear(collection);
        }
        self.flush().await;
        info!("Cleared all collections");

        if self.is_persistent() {
            self.hydrate().await
        } else {
            HydrationReport::default()
        }
    }

    /// Wait until every write issued so far has been attempted
    pub async fn flush(&self) {
        if let Some(writer) = &self.inner.writer {
            writer.flush().await;
        }
    }

    /// Read a generic setting value
    pub fn setting(&self, key: &str) -> Option<Value> {
        self.get(Collection::Settings, key)
            .and_then(|record| record.get("value").cloned())
    }

    /// Store a generic setting value
    pub fn set_setting(&self, key: &str, value: Value) -> ClassroomResult<()> {
        self.put(Collection::Settings, json!({ "key": key, "value": value }))
    }

    /// Export the shared collections as one JSON document
    pub fn export_snapshot(&self) -> Value {
        let mut map = Map::new();
        for collection in Collection::SNAPSHOT {
            map.insert(
                collection.name().to_string(),
                Value::Array(self.get_all(collection)),
            );
        }
        map.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
        Value::Object(map)
    }

    /// Replace collections from a snapshot
    ///
    /// Each collection present in the snapshot is replaced only if it is an
    /// array of keyed objects; malformed collections are skipped and keep
    /// their current contents. Collections absent from the snapshot are not
    /// touched.
    pub fn import_snapshot(&self, snapshot: &Value) -> ClassroomResult<ImportReport> {
        let object = snapshot.as_object().ok_or_else(|| {
            ClassroomError::SnapshotInvalid("expected a JSON object at the top level".to_string())
        })?;

        let mut report = ImportReport::default();
        for collection in Collection::SNAPSHOT {
            let Some(payload) = object.get(collection.name()) else {
                continue;
            };

            match validate_array(collection, payload.clone()) {
                Some(records) => {
                    let records = keyed_table(collection, records);
                    self.clear(collection);
                    for record in &records {
                        self.persist(WriteOp::Put(collection, record.clone()));
                    }
                    report.imported.push((collection, records.len()));
                    self.tables().insert(collection, records);
                }
                None => {
                    warn!("Skipping malformed {} in snapshot", collection);
                    report.skipped.push(collection);
                }
            }
        }

        info!(
            "Snapshot imported: {} collection(s), {} skipped",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Record count per collection
    pub fn stats(&self) -> Vec<(Collection, usize)> {
        let tables = self.tables();
        Collection::ALL
            .into_iter()
            .map(|c| (c, tables.get(&c).map_or(0, Vec::len)))
            .collect()
    }

    /// Whether writes reach a backing store
    pub fn is_persistent(&self) -> bool {
        self.inner.writer.is_some()
    }

    /// Name of the backing store implementation
    pub fn backend_name(&self) -> &'static str {
        self.inner.store.backend_name()
    }

    /// Number of background writes the store rejected
    pub fn failed_writes(&self) -> u64 {
        self.inner.writer.as_ref().map_or(0, WriteBehind::failures)
    }

    /// Report from the most recent hydration
    pub fn hydration(&self) -> HydrationReport {
        self.inner
            .hydration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn persist(&self, op: WriteOp) {
        match &self.inner.writer {
            Some(writer) => writer.submit(op),
            None => debug!("Persistence disabled, keeping {:?} in memory", op),
        }
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Record>>> {
        self.inner.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn empty_tables() -> HashMap<Collection, Vec<Record>> {
    Collection::ALL.into_iter().map(|c| (c, Vec::new())).collect()
}

/// Deduplicate by key (last wins) and drop records without a key
fn keyed_table(collection: Collection, records: Vec<Record>) -> Vec<Record> {
    let mut table = Vec::with_capacity(records.len());
    for record in records {
        if let Err(e) = upsert(&mut table, collection, record) {
            warn!("Dropping record: {}", e);
        }
    }
    table
}
