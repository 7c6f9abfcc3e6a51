//! Workspace tree operations
//!
//! A [`Workspace`] holds one owner's [`Project`] and mutates it in memory.
//! Every mutation writes the whole project back through the [`Cache`] under
//! the owner's id, so the Cache (and eventually the store) always holds the
//! latest tree.

use super::model::{File, Folder, Project};
use super::path::{self, ROOT};
use super::render::{self, TreeNode};
use super::role::{Capabilities, Owner};
use super::session::OpenSession;
use crate::cache::Cache;
use crate::error::{ClassroomError, ClassroomResult};
use crate::store::Collection;
use serde_json::Value;
use tracing::{debug, info, warn};

/// One owner's project, backed by the Cache
pub struct Workspace {
    cache: Cache,
    owner: Owner,
    project: Project,
    session: OpenSession,
}

impl Workspace {
    /// Load the owner's project, creating the starter project if none exists
    ///
    /// A stored project that cannot be read is replaced by the starter
    /// project as well.
    pub fn open(cache: Cache, owner: Owner) -> ClassroomResult<Self> {
        let stored = cache.get(Collection::Projects, &owner.id);
        let (project, created) = match stored {
            Some(record) => match serde_json::from_value::<Project>(record) {
                Ok(project) => (project, false),
                Err(e) => {
                    warn!("Stored project for {} is unreadable, starting over: {}", owner.id, e);
                    (Project::starter(), true)
                }
            },
            None => (Project::starter(), true),
        };

        let workspace = Self {
            cache,
            owner,
            project,
            session: OpenSession::new(),
        };

        if created {
            info!("Created starter project for {}", workspace.owner.id);
            workspace.save()?;
        }
        Ok(workspace)
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn capabilities(&self) -> Capabilities {
        self.owner.role.capabilities()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn files(&self) -> &[File] {
        &self.project.files
    }

    pub fn folders(&self) -> &[Folder] {
        &self.project.folders
    }

    pub fn file(&self, id: &str) -> Option<&File> {
        self.project.files.iter().find(|f| f.id == id)
    }

    pub fn file_by_path(&self, file_path: &str) -> Option<&File> {
        self.project.files.iter().find(|f| f.path == file_path)
    }

    pub fn folder_by_path(&self, folder_path: &str) -> Option<&Folder> {
        self.project.folders.iter().find(|f| f.path == folder_path)
    }

    pub fn session(&self) -> &OpenSession {
        &self.session
    }

    /// Adopt a previously saved session, dropping tabs of deleted files
    pub fn restore_session(&mut self, mut session: OpenSession) {
        let known: std::collections::HashSet<&str> =
            self.project.files.iter().map(|f| f.id.as_str()).collect();
        session.retain(|tab| known.contains(tab));
        self.session = session;
    }

    /// File currently active in the session, if it still exists
    pub fn active_file(&self) -> Option<&File> {
        self.session.active().and_then(|id| self.file(id))
    }

    /// Create every missing folder along `folder_path`
    ///
    /// Returns the deepest folder, or `None` for the root. Calling it again
    /// with the same path creates nothing and returns the same folder.
    pub fn ensure_folder(&mut self, folder_path: &str) -> ClassroomResult<Option<Folder>> {
        let normalized = path::normalize_folder(folder_path)?;
        if normalized == ROOT {
            return Ok(None);
        }

        let mut current = ROOT.to_string();
        let mut deepest = None;
        let mut created = false;
        for segment in path::segments(&normalized) {
            let next = format!("{}{}/", current, segment);
            let folder = match self.folder_by_path(&next) {
                Some(folder) => folder.clone(),
                None => {
                    let folder = Folder::new(segment, &current);
                    debug!("Creating folder {}", folder.path);
                    self.project.folders.push(folder.clone());
                    created = true;
                    folder
                }
            };
            current = next;
            deepest = Some(folder);
        }

        if created {
            self.save()?;
        }
        Ok(deepest)
    }

    /// Create a folder named `name` inside `parent`
    pub fn create_folder(&mut self, name: &str, parent: &str) -> ClassroomResult<Folder> {
        path::validate_name(name)?;
        let parent = path::normalize_folder(parent)?;
        let target = format!("{}{}/", parent, name);
        self.ensure_folder(&target)?
            .ok_or_else(|| ClassroomError::Internal(format!("folder {target} resolved to root")))
    }

    /// Create a file in `folder`
    ///
    /// The kind is inferred from `name`; without `content` the kind's default
    /// content is used. Missing folders along `folder` are created.
    pub fn create_file(
        &mut self,
        name: &str,
        content: Option<String>,
        folder: &str,
    ) -> ClassroomResult<File> {
        path::validate_name(name)?;
        let folder = path::normalize_folder(folder)?;
        if folder != ROOT && self.folder_by_path(&folder).is_none() {
            self.ensure_folder(&folder)?;
        }

        let kind = super::kind::FileKind::from_name(name);
        let content = content.unwrap_or_else(|| kind.default_content().to_string());
        let file = File::new(name, content, &folder);

        debug!("Creating file {} ({})", file.path, file.kind);
        self.project.files.push(file.clone());
        self.save()?;
        Ok(file)
    }

    /// Rename a file in place, re-inferring its kind
    ///
    /// Returns `None` when the id is unknown.
    pub fn rename_file(&mut self, id: &str, new_name: &str) -> ClassroomResult<Option<File>> {
        path::validate_name(new_name)?;
        let Some(file) = self.project.files.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        file.path = path::with_file_name(&file.path, new_name);
        file.name = new_name.to_string();
        file.kind = super::kind::FileKind::from_name(new_name);
        file.touch();
        let renamed = file.clone();

        self.save()?;
        Ok(Some(renamed))
    }

    /// Replace a file's content; `None` when the id is unknown
    pub fn update_content(&mut self, id: &str, content: String) -> ClassroomResult<Option<File>> {
        let Some(file) = self.project.files.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        file.content = content;
        file.touch();
        let updated = file.clone();

        self.save()?;
        Ok(Some(updated))
    }

    /// Delete a file and close its tab; `false` when the id is unknown
    pub fn delete_file(&mut self, id: &str) -> ClassroomResult<bool> {
        let before = self.project.files.len();
        self.project.files.retain(|f| f.id != id);
        if self.project.files.len() == before {
            return Ok(false);
        }

        self.session.close_tab(id);
        self.save()?;
        Ok(true)
    }

    /// Delete a folder with everything beneath it; `false` when the id is unknown
    pub fn delete_folder(&mut self, id: &str) -> ClassroomResult<bool> {
        let Some(target) = self
            .project
            .folders
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.path.clone())
        else {
            return Ok(false);
        };

        let files_before = self.project.files.len();
        let folders_before = self.project.folders.len();

        self.project
            .files
            .retain(|f| !path::is_within(&target, &path::file_folder(&f.path)));
        self.project
            .folders
            .retain(|f| f.id != id && !path::is_within(&target, &f.path));

        let remaining: std::collections::HashSet<&str> =
            self.project.files.iter().map(|f| f.id.as_str()).collect();
        self.session.retain(|tab| remaining.contains(tab));

        info!(
            "Deleted folder {} ({} file(s), {} folder(s))",
            target,
            files_before - self.project.files.len(),
            folders_before - self.project.folders.len()
        );
        self.save()?;
        Ok(true)
    }

    /// Open a file's tab; `false` when the id is unknown
    pub fn open_tab(&mut self, id: &str) -> bool {
        if self.file(id).is_none() {
            return false;
        }
        self.session.open_tab(id);
        true
    }

    /// Close a file's tab
    pub fn close_tab(&mut self, id: &str) {
        self.session.close_tab(id);
    }

    /// Nested view of the project
    pub fn materialize_tree(&self) -> TreeNode {
        render::materialize(&self.project)
    }

    /// Serialize the project as pretty JSON
    pub fn export_project(&self) -> ClassroomResult<String> {
        Ok(serde_json::to_string_pretty(&self.project)?)
    }

    /// Replace the project with a previously exported one
    ///
    /// A malformed payload leaves the current project untouched.
    pub fn import_project(&mut self, payload: &str) -> ClassroomResult<()> {
        let project: Project = serde_json::from_str(payload)
            .map_err(|e| ClassroomError::SnapshotInvalid(e.to_string()))?;

        self.project = project;
        let remaining: std::collections::HashSet<String> =
            self.project.files.iter().map(|f| f.id.clone()).collect();
        self.session.retain(|tab| remaining.contains(tab));

        info!(
            "Imported project for {}: {} file(s), {} folder(s)",
            self.owner.id,
            self.project.files.len(),
            self.project.folders.len()
        );
        self.save()
    }

    /// Add files addressed by relative paths such as `site/css/main.css`
    ///
    /// Intermediate folders are created as needed.
    pub fn upload<I>(&mut self, entries: I) -> ClassroomResult<Vec<File>>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut created = Vec::new();
        for (relative, content) in entries {
            let segments = path::segments(&relative);
            let Some((name, folders)) = segments.split_last() else {
                return Err(ClassroomError::invalid_path(relative.as_str(), "empty path"));
            };
            let folder = path::join_folder(folders);
            created.push(self.create_file(name, Some(content), &folder)?);
        }
        Ok(created)
    }

    /// Remove every file and folder and close all tabs
    pub fn clear(&mut self) -> ClassroomResult<()> {
        self.project = Project::default();
        self.session.clear();
        self.save()
    }

    fn save(&self) -> ClassroomResult<()> {
        let mut record = serde_json::to_value(&self.project)?;
        if let Value::Object(map) = &mut record {
            map.insert(
                Collection::Projects.key_field().to_string(),
                Value::String(self.owner.id.clone()),
            );
        }
        self.cache.put(Collection::Projects, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::workspace::kind::FileKind;
    use std::sync::Arc;

    async fn workspace() -> Workspace {
        let cache = Cache::open(Arc::new(MemoryStore::new()), None).await;
        let mut ws = Workspace::open(cache, Owner::teacher("t1")).unwrap();
        ws.clear().unwrap();
        ws
    }

    fn all_paths(ws: &Workspace) -> Vec<String> {
        ws.folders()
            .iter()
            .map(|f| f.path.clone())
            .chain(ws.files().iter().map(|f| f.path.clone()))
            .collect()
    }

    #[tokio::test]
    async fn starter_project_is_created_and_persisted() {
        let cache = Cache::open(Arc::new(MemoryStore::new()), None).await;
        let ws = Workspace::open(cache.clone(), Owner::student("s1")).unwrap();

        assert_eq!(ws.files().len(), 3);
        let record = cache.get(Collection::Projects, "s1").unwrap();
        assert_eq!(record["files"].as_array().unwrap().len(), 3);
        assert!(ws.capabilities().can_submit_homework);
    }

    #[tokio::test]
    async fn reopening_loads_stored_project() {
        let cache = Cache::open(Arc::new(MemoryStore::new()), None).await;
        let mut ws = Workspace::open(cache.clone(), Owner::teacher("t1")).unwrap();
        let file = ws.create_file("extra.txt", Some("hi".into()), "/").unwrap();

        let again = Workspace::open(cache, Owner::teacher("t1")).unwrap();
        assert_eq!(again.file(&file.id).unwrap().content, "hi");
        assert_eq!(again.files().len(), 4);
    }

    #[tokio::test]
    async fn unreadable_project_falls_back_to_starter() {
        let cache = Cache::open(Arc::new(MemoryStore::new()), None).await;
        cache
            .put(
                Collection::Projects,
                serde_json::json!({"userId": "t1", "files": "nope"}),
            )
            .unwrap();
        let ws = Workspace::open(cache, Owner::teacher("t1")).unwrap();
        assert_eq!(ws.files().len(), 3);
    }

    #[tokio::test]
    async fn ensure_folder_is_idempotent() {
        let mut ws = workspace().await;
        let first = ws.ensure_folder("a/b/c").unwrap().unwrap();
        let second = ws.ensure_folder("/a/b/c/").unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.path, "/a/b/c/");
        assert_eq!(ws.folders().len(), 3);
        assert!(ws.ensure_folder("/").unwrap().is_none());
    }

    #[tokio::test]
    async fn ensure_folder_reuses_existing_ancestors() {
        let mut ws = workspace().await;
        let a = ws.create_folder("a", "/").unwrap();
        ws.ensure_folder("/a/b/").unwrap();

        assert_eq!(ws.folders().len(), 2);
        assert_eq!(ws.folder_by_path("/a/").unwrap().id, a.id);
    }

    #[tokio::test]
    async fn ensure_folder_fills_gaps_above_existing_folder() {
        let mut ws = workspace().await;
        let payload = serde_json::json!({
            "files": [],
            "folders": [{"id": "f-b", "name": "b", "path": "/a/b/"}]
        });
        ws.import_project(&payload.to_string()).unwrap();

        let b = ws.ensure_folder("/a/b/").unwrap().unwrap();
        assert_eq!(b.id, "f-b");
        assert!(ws.folder_by_path("/a/").is_some());
        assert_eq!(ws.folders().len(), 2);
    }

    #[tokio::test]
    async fn create_file_infers_kind_and_default_content() {
        let mut ws = workspace().await;
        let cases = [
            ("index.html", FileKind::Markup),
            ("style.css", FileKind::Stylesheet),
            ("app.js", FileKind::Script),
            ("x.unknownext", FileKind::PlainText),
        ];
        for (name, kind) in cases {
            let file = ws.create_file(name, None, "/").unwrap();
            assert_eq!(file.kind, kind, "{name}");
            assert_eq!(file.content, kind.default_content());
            assert_eq!(file.path, format!("/{name}"));
        }

        let explicit = ws.create_file("b.js", Some(String::new()), "/").unwrap();
        assert_eq!(explicit.content, "");
    }

    #[tokio::test]
    async fn create_file_in_missing_folder_creates_it() {
        let mut ws = workspace().await;
        let file = ws.create_file("main.js", None, "src/app").unwrap();

        assert_eq!(file.path, "/src/app/main.js");
        assert!(ws.folder_by_path("/src/").is_some());
        assert!(ws.folder_by_path("/src/app/").is_some());
    }

    #[tokio::test]
    async fn create_file_rejects_bad_names() {
        let mut ws = workspace().await;
        assert!(ws.create_file("", None, "/").is_err());
        assert!(ws.create_file("a/b.js", None, "/").is_err());
        assert!(ws.files().is_empty());
    }

    #[tokio::test]
    async fn rename_rewrites_path_and_kind() {
        let mut ws = workspace().await;
        let file = ws.create_file("notes.txt", None, "/docs/").unwrap();

        let renamed = ws.rename_file(&file.id, "page.html").unwrap().unwrap();
        assert_eq!(renamed.path, "/docs/page.html");
        assert_eq!(renamed.kind, FileKind::Markup);
        assert!(renamed.updated_at.is_some());

        assert!(ws.rename_file("missing", "x.js").unwrap().is_none());
    }

    #[tokio::test]
    async fn update_content_persists() {
        let mut ws = workspace().await;
        let file = ws.create_file("a.js", None, "/").unwrap();
        ws.update_content(&file.id, "console.log(1)".into()).unwrap();

        let record = ws.cache.get(Collection::Projects, "t1").unwrap();
        assert_eq!(record["files"][0]["content"], "console.log(1)");
        assert!(ws.update_content("missing", String::new()).unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_file_closes_tab() {
        let mut ws = workspace().await;
        let a = ws.create_file("a.js", None, "/").unwrap();
        let b = ws.create_file("b.js", None, "/").unwrap();
        assert!(ws.open_tab(&a.id));
        assert!(ws.open_tab(&b.id));

        assert!(ws.delete_file(&b.id).unwrap());
        assert_eq!(ws.session().tabs(), [a.id.clone()]);
        assert_eq!(ws.session().active(), Some(a.id.as_str()));
        assert!(!ws.delete_file(&b.id).unwrap());
        assert!(!ws.open_tab("missing"));
    }

    #[tokio::test]
    async fn restored_session_skips_missing_files() {
        let mut ws = workspace().await;
        let a = ws.create_file("a.js", None, "/").unwrap();
        let mut saved = OpenSession::new();
        saved.open_tab(&a.id);
        saved.open_tab("gone");

        ws.restore_session(saved);
        assert_eq!(ws.session().tabs(), [a.id.clone()]);
        assert_eq!(ws.active_file().unwrap().id, a.id);
    }

    #[tokio::test]
    async fn delete_folder_cascades_through_subtree() {
        let mut ws = workspace().await;
        let top = ws.ensure_folder("/a/").unwrap().unwrap();
        ws.ensure_folder("/a/b/c/").unwrap();
        ws.create_file("1.js", None, "/a/").unwrap();
        let deep = ws.create_file("2.js", None, "/a/b/c/").unwrap();
        ws.create_file("keep.js", None, "/").unwrap();
        ws.open_tab(&deep.id);

        assert!(ws.delete_folder(&top.id).unwrap());

        assert!(all_paths(&ws).iter().all(|p| !path::is_within("/a/", p)));
        assert_eq!(all_paths(&ws), ["/keep.js"]);
        assert!(ws.session().tabs().is_empty());
        assert!(!ws.delete_folder(&top.id).unwrap());
    }

    #[tokio::test]
    async fn delete_folder_spares_prefix_siblings() {
        let mut ws = workspace().await;
        let abc = ws.ensure_folder("/abc/").unwrap().unwrap();
        ws.ensure_folder("/abcdef/").unwrap();
        ws.create_file("x.js", None, "/abc/").unwrap();
        ws.create_file("y.js", None, "/abcdef/").unwrap();
        ws.create_file("abc.js", None, "/").unwrap();

        ws.delete_folder(&abc.id).unwrap();

        let mut paths = all_paths(&ws);
        paths.sort();
        assert_eq!(paths, ["/abc.js", "/abcdef/", "/abcdef/y.js"]);
    }

    #[tokio::test]
    async fn export_import_roundtrip() {
        let mut ws = workspace().await;
        ws.ensure_folder("/lib/").unwrap();
        ws.create_file("a.js", Some("let a = '✓';\n".into()), "/lib/").unwrap();
        ws.create_file("index.html", None, "/").unwrap();
        let exported = ws.export_project().unwrap();
        let before = ws.project().clone();

        let cache = Cache::open(Arc::new(MemoryStore::new()), None).await;
        let mut other = Workspace::open(cache.clone(), Owner::student("s9")).unwrap();
        other.import_project(&exported).unwrap();

        assert_eq!(other.project(), &before);
        let stored: Project =
            serde_json::from_value(cache.get(Collection::Projects, "s9").unwrap()).unwrap();
        assert_eq!(stored, before);
    }

    #[tokio::test]
    async fn import_rejects_malformed_payload() {
        let mut ws = workspace().await;
        ws.create_file("a.js", None, "/").unwrap();

        let err = ws.import_project("{\"files\": 3}").unwrap_err();
        assert!(matches!(err, ClassroomError::SnapshotInvalid(_)));
        assert_eq!(ws.files().len(), 1);
    }

    #[tokio::test]
    async fn upload_creates_folders_from_relative_paths() {
        let mut ws = workspace().await;
        let created = ws
            .upload([
                ("site/index.html".to_string(), "<p>hi</p>".to_string()),
                ("site/css/main.css".to_string(), "p {}".to_string()),
                ("readme.txt".to_string(), "read me".to_string()),
            ])
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(created[1].path, "/site/css/main.css");
        assert!(ws.folder_by_path("/site/css/").is_some());
        assert_eq!(ws.file_by_path("/readme.txt").unwrap().content, "read me");
    }

    #[tokio::test]
    async fn materialized_tree_reflects_project() {
        let mut ws = workspace().await;
        ws.create_file("main.js", None, "/src/").unwrap();
        ws.create_file("index.html", None, "/").unwrap();

        let tree = ws.materialize_tree();
        assert_eq!(tree.to_listing(), "src/\n  main.js\nindex.html\n");
    }
}
