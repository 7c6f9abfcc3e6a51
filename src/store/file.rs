//! JSON-file store backend
//!
//! Each collection lives in `<dir>/<collection>.json` as a JSON array of
//! records in insertion order. Writes replace the whole file atomically
//! (temp file + rename), so a crash mid-write leaves the previous version.

use super::{remove, upsert, Collection, Record, StoreAdapter};
use crate::error::{ClassroomError, ClassroomResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Store backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir` (created on `open`)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    async fn read(&self, collection: Collection) -> ClassroomResult<Vec<Record>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await.map_err(|e| {
            ClassroomError::store_io(format!("reading collection file {}", path.display()), e)
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, collection: Collection, records: &[Record]) -> ClassroomResult<()> {
        let path = self.collection_path(collection);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)?;

        fs::write(&tmp, content).await.map_err(|e| {
            ClassroomError::store_io(format!("writing collection file {}", tmp.display()), e)
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            ClassroomError::store_io(format!("replacing collection file {}", path.display()), e)
        })?;

        debug!("Wrote {} record(s) to {}", records.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for FileStore {
    async fn open(&self, collections: &[Collection]) -> ClassroomResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            ClassroomError::StoreUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        for collection in collections {
            if !self.collection_path(*collection).exists() {
                self.write(*collection, &[]).await?;
            }
        }

        debug!("Opened file store at {}", self.dir.display());
        Ok(())
    }

    async fn get_all(&self, collection: Collection) -> ClassroomResult<Vec<Record>> {
        self.read(collection).await
    }

    async fn get(&self, collection: Collection, key: &str) -> ClassroomResult<Option<Record>> {
        Ok(self
            .read(collection)
            .await?
            .into_iter()
            .find(|r| collection.key_of(r).as_deref() == Some(key)))
    }

    async fn put(&self, collection: Collection, record: Record) -> ClassroomResult<()> {
        let mut records = self.read(collection).await?;
        upsert(&mut records, collection, record)?;
        self.write(collection, &records).await
    }

    async fn delete(&self, collection: Collection, key: &str) -> ClassroomResult<()> {
        let mut records = self.read(collection).await?;
        let before = records.len();
        remove(&mut records, collection, key);
        if records.len() == before {
            return Ok(());
        }
        self.write(collection, &records).await
    }

    async fn clear(&self, collection: Collection) -> ClassroomResult<()> {
        self.write(collection, &[]).await
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn test_store() -> (FileStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("store"));
        store.open(&Collection::ALL).await.unwrap();
        (store, temp)
    }

    #[tokio::test]
    async fn open_creates_collection_files() {
        let (store, _temp) = test_store().await;
        assert!(store.dir().join("codeLibrary.json").exists());
        assert!(store.dir().join("projects.json").exists());
        assert!(store.get_all(Collection::Teachers).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_persists_across_instances() {
        let (store, _temp) = test_store().await;
        store
            .put(Collection::Projects, json!({"userId": "u1", "files": []}))
            .await
            .unwrap();

        let reopened = FileStore::new(store.dir().to_path_buf());
        let got = reopened.get(Collection::Projects, "u1").await.unwrap();
        assert!(got.is_some());
        assert!(!store.dir().join("projects.json.tmp").exists());
    }

    #[tokio::test]
    async fn put_replaces_same_key() {
        let (store, _temp) = test_store().await;
        store
            .put(Collection::Settings, json!({"key": "k", "value": "A"}))
            .await
            .unwrap();
        store
            .put(Collection::Settings, json!({"key": "k", "value": "B"}))
            .await
            .unwrap();

        let all = store.get_all(Collection::Settings).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["value"], "B");
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let (store, _temp) = test_store().await;
        for id in ["a", "b", "c"] {
            store
                .put(Collection::Homework, json!({"id": id}))
                .await
                .unwrap();
        }

        store.delete(Collection::Homework, "b").await.unwrap();
        store.delete(Collection::Homework, "missing").await.unwrap();
        assert_eq!(store.get_all(Collection::Homework).await.unwrap().len(), 2);

        store.clear(Collection::Homework).await.unwrap();
        assert!(store.get_all(Collection::Homework).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let (store, _temp) = test_store().await;
        tokio::fs::write(store.dir().join("students.json"), "{not json")
            .await
            .unwrap();
        assert!(store.get_all(Collection::Students).await.is_err());
    }
}
