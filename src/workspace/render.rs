//! Nested view of a project for display
//!
//! Folders are indexed by path and linked to their parent path. A folder or
//! file whose parent folder does not exist is attached directly under root
//! instead of being reported as an inconsistency.

use super::kind::FileKind;
use super::model::Project;
use super::path::{self, ROOT};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One node of the materialized tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder {
        /// `None` for the root
        id: Option<String>,
        name: String,
        path: String,
        children: Vec<TreeNode>,
    },
    File {
        id: String,
        name: String,
        path: String,
        kind: FileKind,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Folder { path, .. } | Self::File { path, .. } => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Child nodes; empty for files
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Folder { children, .. } => children,
            Self::File { .. } => &[],
        }
    }

    /// Total number of nodes beneath this one
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Render as an indented listing, folders suffixed with `/`
    pub fn to_listing(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.write_listing(0, &mut out);
        }
        out
    }

    fn write_listing(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.name());
        if self.is_folder() {
            out.push('/');
        }
        out.push('\n');
        for child in self.children() {
            child.write_listing(depth + 1, out);
        }
    }
}

enum Entry<'a> {
    Folder(&'a super::model::Folder),
    File(&'a super::model::File),
}

/// Build the nested tree for a project
pub fn materialize(project: &Project) -> TreeNode {
    let mut known: HashSet<&str> = HashSet::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();

    // First folder per path wins; later duplicates become empty leaves
    for folder in &project.folders {
        if folder.path != ROOT && known.insert(folder.path.as_str()) {
            owners.insert(folder.path.as_str(), folder.id.as_str());
        }
    }

    let mut children: HashMap<String, Vec<Entry<'_>>> = HashMap::new();
    let attach_point = |parent: String| -> String {
        if parent == ROOT || known.contains(parent.as_str()) {
            parent
        } else {
            ROOT.to_string()
        }
    };

    for folder in &project.folders {
        if folder.path == ROOT {
            continue;
        }
        let parent = path::parent_folder(&folder.path).unwrap_or_else(|| ROOT.to_string());
        children
            .entry(attach_point(parent))
            .or_default()
            .push(Entry::Folder(folder));
    }

    for file in &project.files {
        let parent = path::file_folder(&file.path);
        children
            .entry(attach_point(parent))
            .or_default()
            .push(Entry::File(file));
    }

    let root_children = build_children(ROOT, &mut children, &owners);
    TreeNode::Folder {
        id: None,
        name: "root".to_string(),
        path: ROOT.to_string(),
        children: root_children,
    }
}

fn build_children(
    folder_path: &str,
    children: &mut HashMap<String, Vec<Entry<'_>>>,
    owners: &HashMap<&str, &str>,
) -> Vec<TreeNode> {
    let entries = children.remove(folder_path).unwrap_or_default();
    let mut nodes: Vec<TreeNode> = entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Folder(folder) => {
                let owns_path = owners.get(folder.path.as_str()) == Some(&folder.id.as_str());
                let nested = if owns_path {
                    build_children(&folder.path, children, owners)
                } else {
                    Vec::new()
                };
                TreeNode::Folder {
                    id: Some(folder.id.clone()),
                    name: folder.name.clone(),
                    path: folder.path.clone(),
                    children: nested,
                }
            }
            Entry::File(file) => TreeNode::File {
                id: file.id.clone(),
                name: file.name.clone(),
                path: file.path.clone(),
                kind: file.kind,
            },
        })
        .collect();

    nodes.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.name().cmp(b.name()))
    });
    nodes
}
