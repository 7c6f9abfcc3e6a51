//! Write-behind persistence worker
//!
//! Every Cache mutation enqueues one [`WriteOp`]; a single background task
//! applies them to the backing store in submission order. Submitting never
//! blocks and never waits for the store. A failed write is logged and dropped.

use crate::store::{Collection, Record, StoreAdapter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// One pending backing-store write
#[derive(Debug)]
pub(crate) enum WriteOp {
    Put(Collection, Record),
    Delete(Collection, String),
    Clear(Collection),
    /// Barrier: answered once every earlier op has been applied
    Flush(oneshot::Sender<()>),
}

/// Handle to the write-behind worker
#[derive(Debug)]
pub(crate) struct WriteBehind {
    tx: mpsc::UnboundedSender<WriteOp>,
    failures: Arc<AtomicU64>,
}

impl WriteBehind {
    /// Spawn the worker on the current tokio runtime
    pub(crate) fn spawn(store: Arc<dyn StoreAdapter>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let failures = Arc::new(AtomicU64::new(0));
        tokio::spawn(run(store, rx, Arc::clone(&failures)));
        Self { tx, failures }
    }

    /// Enqueue a write without waiting for it
    pub(crate) fn submit(&self, op: WriteOp) {
        if let Err(e) = self.tx.send(op) {
            warn!("Write-behind worker stopped, dropping {:?}", e.0);
        }
    }

    /// Wait until every write submitted so far has reached the store
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.submit(WriteOp::Flush(done));
        // A closed barrier means the worker is gone; nothing left to wait for
        let _ = wait.await;
    }

    /// Number of writes the store rejected
    pub(crate) fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

async fn run(
    store: Arc<dyn StoreAdapter>,
    mut rx: mpsc::UnboundedReceiver<WriteOp>,
    failures: Arc<AtomicU64>,
) {
    while let Some(op) = rx.recv().await {
        let result = match op {
            WriteOp::Put(collection, record) => store.put(collection, record).await,
            WriteOp::Delete(collection, key) => store.delete(collection, &key).await,
            WriteOp::Clear(collection) => store.clear(collection).await,
            WriteOp::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        if let Err(e) = result {
            failures.fetch_add(1, Ordering::Relaxed);
            warn!("Backing store write failed ({}): {}", store.backend_name(), e);
        }
    }
    debug!("Write-behind worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn applies_in_submission_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = WriteBehind::spawn(store.clone());

        writer.submit(WriteOp::Put(Collection::Settings, json!({"key": "k", "value": 1})));
        writer.submit(WriteOp::Put(Collection::Settings, json!({"key": "k", "value": 2})));
        writer.submit(WriteOp::Put(Collection::Settings, json!({"key": "j", "value": 3})));
        writer.submit(WriteOp::Delete(Collection::Settings, "j".to_string()));
        writer.flush().await;

        let stored = store.stored(Collection::Settings);
        assert_eq!(stored, vec![json!({"key": "k", "value": 2})]);
    }

    #[tokio::test]
    async fn failures_are_counted_not_retried() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let writer = WriteBehind::spawn(store.clone());

        writer.submit(WriteOp::Put(Collection::Homework, json!({"id": "h1"})));
        writer.submit(WriteOp::Clear(Collection::Homework));
        writer.flush().await;
        assert_eq!(writer.failures(), 2);

        store.fail_writes(false);
        writer.flush().await;
        assert!(store.stored(Collection::Homework).is_empty());
    }
}
