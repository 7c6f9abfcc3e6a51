//! Shared state for one CLI invocation

use crate::cache::Cache;
use crate::config::{Config, ConfigManager};
use crate::error::{ClassroomError, ClassroomResult};
use crate::store::{FileStore, LegacySource, MemoryStore, StoreAdapter};
use crate::workspace::{File, Folder, OpenSession, Owner, Workspace};
use std::sync::Arc;
use tracing::{debug, warn};

/// Loaded config, the hydrated Cache and the selected owner
pub struct AppContext {
    pub config: Config,
    pub cache: Cache,
    pub owner: Owner,
}

impl AppContext {
    /// Open the configured store and hydrate the Cache
    pub async fn open(config: Config, owner: Owner) -> ClassroomResult<Self> {
        let store: Arc<dyn StoreAdapter> = if config.store.in_memory {
            debug!("Using in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            ConfigManager::ensure_state_dirs().await?;
            let dir = config
                .store
                .dir
                .clone()
                .unwrap_or_else(ConfigManager::store_dir);
            debug!("Using file store at {}", dir.display());
            Arc::new(FileStore::new(dir))
        };

        let legacy_dir = config
            .store
            .legacy_dir
            .clone()
            .unwrap_or_else(ConfigManager::legacy_dir);
        let legacy = legacy_dir.is_dir().then(|| LegacySource::new(legacy_dir));

        let cache = Cache::open(store, legacy).await;
        Ok(Self {
            config,
            cache,
            owner,
        })
    }

    /// The owner's workspace with its saved tabs restored
    pub fn workspace(&self) -> ClassroomResult<Workspace> {
        let mut workspace = Workspace::open(self.cache.clone(), self.owner.clone())?;
        if let Some(saved) = self.cache.setting(&self.session_key()) {
            match serde_json::from_value::<OpenSession>(saved) {
                Ok(session) => workspace.restore_session(session),
                Err(e) => warn!("Ignoring unreadable tab state: {}", e),
            }
        }
        Ok(workspace)
    }

    /// Remember the workspace's open tabs for the next invocation
    pub fn save_session(&self, workspace: &Workspace) -> ClassroomResult<()> {
        let value = serde_json::to_value(workspace.session())?;
        self.cache.set_setting(&self.session_key(), value)
    }

    /// Wait for background writes and report any the store rejected
    pub async fn close(self) {
        self.cache.flush().await;
        let failed = self.cache.failed_writes();
        if failed > 0 {
            warn!("{} write(s) could not be persisted", failed);
        }
    }

    fn session_key(&self) -> String {
        format!("tabs.{}", self.owner.id)
    }
}

/// Look up a file by path or fail with a user-facing error
pub fn require_file<'a>(workspace: &'a Workspace, path: &str) -> ClassroomResult<&'a File> {
    let path = normalize_file_path(path);
    workspace
        .file_by_path(&path)
        .ok_or(ClassroomError::FileNotFound(path))
}

/// Look up a folder by path or fail with a user-facing error
pub fn require_folder<'a>(workspace: &'a Workspace, path: &str) -> ClassroomResult<&'a Folder> {
    let path = crate::workspace::path::normalize_folder(path)?;
    workspace
        .folder_by_path(&path)
        .ok_or(ClassroomError::FolderNotFound(path))
}

/// Accept `a/b.js` as well as `/a/b.js`
fn normalize_file_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_context() -> AppContext {
        let mut config = Config::default();
        config.store.in_memory = true;
        config.store.legacy_dir = Some("/nonexistent/classroom-legacy".into());
        AppContext::open(config, Owner::teacher("t1")).await.unwrap()
    }

    #[tokio::test]
    async fn session_survives_reopen() {
        let ctx = memory_context().await;
        let mut ws = ctx.workspace().unwrap();
        let id = ws.file_by_path("/script.js").unwrap().id.clone();
        ws.open_tab(&id);
        ctx.save_session(&ws).unwrap();

        let again = ctx.workspace().unwrap();
        assert_eq!(again.session().active(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn file_lookup_accepts_relative_paths() {
        let ctx = memory_context().await;
        let ws = ctx.workspace().unwrap();

        assert_eq!(require_file(&ws, "index.html").unwrap().path, "/index.html");
        assert!(matches!(
            require_file(&ws, "/nope.js"),
            Err(ClassroomError::FileNotFound(_))
        ));
        assert!(matches!(
            require_folder(&ws, "src"),
            Err(ClassroomError::FolderNotFound(_))
        ));
    }
}
