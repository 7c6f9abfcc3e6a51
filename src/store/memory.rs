//! In-process store backend

use super::{remove, upsert, Collection, Record, StoreAdapter};
use crate::error::{ClassroomError, ClassroomResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Store that keeps collections in memory
///
/// Used for `store.in_memory = true` and by tests. Failures can be injected
/// to exercise the Cache's degradation paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Record>>>,
    fail_open: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: impl IntoIterator<Item = (Collection, Vec<Record>)>) -> Self {
        let store = Self::new();
        store.tables().extend(records);
        store
    }

    /// Make `open` fail
    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Make `get_all`/`get` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `put`/`delete`/`clear` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of a collection as currently stored
    pub fn stored(&self, collection: Collection) -> Vec<Record> {
        self.tables().get(&collection).cloned().unwrap_or_default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Record>>> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> ClassroomResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(ClassroomError::StoreUnavailable(format!(
                "memory store {what} disabled"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    async fn open(&self, collections: &[Collection]) -> ClassroomResult<()> {
        self.check(&self.fail_open, "open")?;
        let mut tables = self.tables();
        for collection in collections {
            tables.entry(*collection).or_default();
        }
        Ok(())
    }

    async fn get_all(&self, collection: Collection) -> ClassroomResult<Vec<Record>> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.stored(collection))
    }

    async fn get(&self, collection: Collection, key: &str) -> ClassroomResult<Option<Record>> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.tables().get(&collection).and_then(|records| {
            records
                .iter()
                .find(|r| collection.key_of(r).as_deref() == Some(key))
                .cloned()
        }))
    }

    async fn put(&self, collection: Collection, record: Record) -> ClassroomResult<()> {
        self.check(&self.fail_writes, "write")?;
        upsert(self.tables().entry(collection).or_default(), collection, record)
    }

    async fn delete(&self, collection: Collection, key: &str) -> ClassroomResult<()> {
        self.check(&self.fail_writes, "write")?;
        if let Some(records) = self.tables().get_mut(&collection) {
            remove(records, collection, key);
        }
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> ClassroomResult<()> {
        self.check(&self.fail_writes, "write")?;
        self.tables().insert(collection, Vec::new());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
